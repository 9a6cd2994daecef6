//! Integration tests for demographic clustering over a mixed population.

use clustering::{ClusterConfig, DemographicClusterer, assign_clusters};
use data_loader::{AgeGroup, Gender, Occupation, User};

const AGES: [AgeGroup; 4] = [
    AgeGroup::Under18,
    AgeGroup::Age25To34,
    AgeGroup::Age45To49,
    AgeGroup::Age56Plus,
];

const OCCUPATIONS: [Occupation; 5] = [
    Occupation::K12Student,
    Occupation::Programmer,
    Occupation::Doctor,
    Occupation::Retired,
    Occupation::Writer,
];

fn population() -> Vec<User> {
    let mut users = Vec::new();
    let mut id = 1;
    for (i, &age) in AGES.iter().enumerate() {
        for (j, &occupation) in OCCUPATIONS.iter().enumerate() {
            let gender = if (i + j) % 2 == 0 { Gender::Female } else { Gender::Male };
            // a few copies of each profile
            for _ in 0..3 {
                users.push(User {
                    id,
                    gender,
                    age,
                    occupation,
                    zipcode: "55455".to_string(),
                });
                id += 1;
            }
        }
    }
    users
}

#[test]
fn test_same_seed_same_labels() {
    let config = ClusterConfig::new(8).with_seed(42);

    let first = DemographicClusterer::new(config.clone()).assign(population()).unwrap();
    let second = DemographicClusterer::new(config).assign(population()).unwrap();

    let first: Vec<_> = first.iter().map(|u| u.cluster).collect();
    let second: Vec<_> = second.iter().map(|u| u.cluster).collect();
    assert_eq!(first, second);
}

#[test]
fn test_every_user_gets_one_cluster_in_range() {
    let users = population();
    let clustered = assign_clusters(users.clone(), 8).unwrap();

    assert_eq!(clustered.len(), users.len());
    for (user, annotated) in users.iter().zip(&clustered) {
        assert_eq!(user.id, annotated.id());
        assert!(annotated.cluster < 8);
    }
}

#[test]
fn test_identical_profiles_share_a_cluster() {
    let clustered = assign_clusters(population(), 6).unwrap();

    // each profile occupies three consecutive users
    for chunk in clustered.chunks(3) {
        assert!(chunk.iter().all(|u| u.cluster == chunk[0].cluster));
    }
}
