//! Sample content for offline use of the in-memory backend.

use wordify_core::model::{Difficulty, Role, TopicDraft, User, VocabularyDraft};

use crate::memory::InMemoryRepository;
use crate::repository::{StorageError, TopicRepository, VocabularyRepository};

pub const DEMO_LEARNER_EMAIL: &str = "learner@wordify.dev";
pub const DEMO_LEARNER_PASSWORD: &str = "learner123";
pub const DEMO_ADMIN_EMAIL: &str = "admin@wordify.dev";
pub const DEMO_ADMIN_PASSWORD: &str = "admin123";

type Word = (&'static str, &'static str, &'static str, &'static str, Difficulty);

const TRAVEL: &[Word] = &[
    ("itinerary", "/aɪˈtɪnəˌrɛri/", "a planned route or journey", "Our itinerary includes three cities.", Difficulty::Medium),
    ("luggage", "/ˈlʌɡɪdʒ/", "bags and cases for travelling", "Keep your luggage with you.", Difficulty::Easy),
    ("passport", "/ˈpæspɔːrt/", "an official travel document", "Show your passport at the gate.", Difficulty::Easy),
    ("layover", "/ˈleɪˌoʊvər/", "a short stop between flights", "We had a two-hour layover.", Difficulty::Medium),
    ("souvenir", "/ˌsuːvəˈnɪr/", "a thing kept as a reminder of a place", "She bought a souvenir mug.", Difficulty::Easy),
    ("customs", "/ˈkʌstəmz/", "the place where goods are checked at a border", "Customs took an hour.", Difficulty::Medium),
];

const FEELINGS: &[Word] = &[
    ("resilient", "/rɪˈzɪliənt/", "able to recover quickly from difficulty", "Children are often resilient.", Difficulty::Hard),
    ("content", "/kənˈtɛnt/", "peacefully happy", "He felt content after dinner.", Difficulty::Medium),
    ("anxious", "/ˈæŋkʃəs/", "worried and nervous", "She was anxious before the exam.", Difficulty::Easy),
    ("elated", "/ɪˈleɪtɪd/", "extremely happy", "They were elated by the news.", Difficulty::Hard),
    ("wistful", "/ˈwɪstfəl/", "sadly longing for something", "A wistful look crossed his face.", Difficulty::Hard),
];

/// Accounts created by [`seed_demo`].
#[derive(Debug, Clone)]
pub struct DemoAccounts {
    pub learner: User,
    pub admin: User,
}

/// Fill `repo` with two topics and a learner and an admin account.
///
/// # Errors
///
/// Returns `StorageError` if the repository already holds conflicting data.
pub async fn seed_demo(repo: &InMemoryRepository) -> Result<DemoAccounts, StorageError> {
    let learner = repo.add_account(DEMO_LEARNER_EMAIL, "Demo Learner", Role::User, DEMO_LEARNER_PASSWORD)?;
    let admin = repo.add_account(DEMO_ADMIN_EMAIL, "Demo Admin", Role::Admin, DEMO_ADMIN_PASSWORD)?;

    for (name, description, color, words) in [
        ("Travel", "Words for getting around", "#3B82F6", TRAVEL),
        ("Feelings", "Describing emotions", "#EC4899", FEELINGS),
    ] {
        let draft = TopicDraft::new(name, description)
            .with_color(color)
            .validate()
            .map_err(|e| StorageError::Validation(e.to_string()))?;
        let topic = repo.create_topic(&draft).await?;

        for &(word, pronunciation, meaning, example, difficulty) in words {
            let draft = VocabularyDraft {
                word: word.to_owned(),
                pronunciation: pronunciation.to_owned(),
                meaning: meaning.to_owned(),
                example: example.to_owned(),
                difficulty,
            };
            repo.create_vocabulary(&topic.id, &draft).await?;
        }
    }

    tracing::debug!("seeded in-memory backend with demo content");
    Ok(DemoAccounts { learner, admin })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn demo_seed_creates_topics_and_accounts() {
        let repo = InMemoryRepository::new();
        let accounts = seed_demo(&repo).await.unwrap();
        assert!(accounts.admin.is_admin());

        let topics = repo.list_topics().await.unwrap();
        assert_eq!(topics.len(), 2);
        assert_eq!(topics[0].vocabulary_count, 6);

        assert!(seed_demo(&repo).await.is_err());
    }
}
