use services::{AdminError, AdminService, AppServices};
use wordify_core::model::{
    Difficulty, Role, StatusAction, TopicDraft, TopicId, UserId, UserQuery, UserStatus,
    VocabularyDraft, VocabularyId,
};

use super::{Exit, Prompt, fields};

const HELP: &str = "\
topics                                 list topics
topic add NAME | DESCRIPTION | COLOR   create a topic
topic edit ID | NAME | DESCRIPTION | COLOR
topic rm ID                            delete a topic and its words
words TOPIC_ID                         list a topic's vocabulary
word add TOPIC_ID | WORD | MEANING | PRONUNCIATION | EXAMPLE | DIFFICULTY
word edit ID | WORD | MEANING | PRONUNCIATION | EXAMPLE | DIFFICULTY
word rm ID                             delete a word
users [SEARCH] [| ROLE] [| STATUS]     list accounts
user ID                                show one account
activate|suspend|ban ID                change an account's status
user rm ID                             delete an account
stats                                  account counts
logout | exit";

pub async fn run(app: &AppServices, prompt: &mut Prompt) -> anyhow::Result<Exit> {
    let admin = app.admin();
    println!("Administration. Type `help` for commands.");
    loop {
        let Some(input) = prompt.ask("\nadmin> ").await? else {
            return Ok(Exit::Quit);
        };
        let (command, rest) = input.split_once(' ').unwrap_or((input.as_str(), ""));
        let outcome = match command {
            "" => Ok(()),
            "help" => {
                println!("{HELP}");
                Ok(())
            }
            "logout" => return Ok(Exit::Logout),
            "exit" | "quit" => return Ok(Exit::Quit),
            "topics" => list_topics(&admin).await,
            "topic" => topic_command(&admin, rest).await,
            "words" => list_words(&admin, rest).await,
            "word" => word_command(&admin, rest).await,
            "users" => list_users(&admin, rest).await,
            "user" => user_command(&admin, rest).await,
            "activate" | "suspend" | "ban" => match command.parse::<StatusAction>() {
                Ok(action) => admin
                    .set_user_status(&UserId::new(rest.trim()), action)
                    .await
                    .map(|()| println!("User is now {}.", action.resulting_status())),
                Err(err) => {
                    println!("{err}");
                    Ok(())
                }
            },
            "stats" => admin.user_stats().await.map(|stats| {
                println!(
                    "{} users: {} active, {} suspended, {} banned; {} admins, {} learners",
                    stats.total_users,
                    stats.active_users,
                    stats.suspended_users,
                    stats.banned_users,
                    stats.admin_users,
                    stats.regular_users,
                );
            }),
            _ => {
                println!("Unknown command. Type `help`.");
                Ok(())
            }
        };
        if let Err(err) = outcome {
            println!("{}", err.user_message());
        }
    }
}

async fn list_topics(admin: &AdminService) -> Result<(), AdminError> {
    for topic in admin.list_topics().await? {
        println!(
            "{:>4}  {:<20} {} words  {}  {}",
            topic.id, topic.name, topic.vocabulary_count, topic.color, topic.description
        );
    }
    Ok(())
}

fn topic_draft(parts: &[&str]) -> TopicDraft {
    let name = parts.first().copied().unwrap_or_default();
    let description = parts.get(1).copied().unwrap_or_default();
    let draft = TopicDraft::new(name, description);
    match parts.get(2).filter(|c| !c.is_empty()) {
        Some(color) => draft.with_color(*color),
        None => draft,
    }
}

async fn topic_command(admin: &AdminService, rest: &str) -> Result<(), AdminError> {
    let (action, args) = rest.split_once(' ').unwrap_or((rest, ""));
    match action {
        "add" => {
            let topic = admin.create_topic(topic_draft(&fields(args))).await?;
            println!("Created topic {} ({}).", topic.name, topic.id);
        }
        "edit" => {
            let parts = fields(args);
            let Some((id, draft)) = parts.split_first() else {
                println!("Usage: topic edit ID | NAME | DESCRIPTION | COLOR");
                return Ok(());
            };
            let topic = admin.update_topic(&TopicId::new(*id), topic_draft(draft)).await?;
            println!("Updated topic {}.", topic.name);
        }
        "rm" => {
            admin.delete_topic(&TopicId::new(args.trim())).await?;
            println!("Topic deleted.");
        }
        _ => println!("Usage: topic add|edit|rm ..."),
    }
    Ok(())
}

async fn list_words(admin: &AdminService, rest: &str) -> Result<(), AdminError> {
    for item in admin.list_vocabulary(&TopicId::new(rest.trim())).await? {
        println!(
            "{:>4}  {:<16} {:<8} {}",
            item.id, item.word, item.difficulty, item.meaning
        );
    }
    Ok(())
}

/// `WORD | MEANING | PRONUNCIATION | EXAMPLE | DIFFICULTY`, trailing fields optional.
fn vocabulary_draft(parts: &[&str]) -> VocabularyDraft {
    let at = |i: usize| parts.get(i).copied().unwrap_or_default().to_owned();
    VocabularyDraft {
        word: at(0),
        meaning: at(1),
        pronunciation: at(2),
        example: at(3),
        difficulty: parts
            .get(4)
            .and_then(|d| d.parse::<Difficulty>().ok())
            .unwrap_or_default(),
    }
}

async fn word_command(admin: &AdminService, rest: &str) -> Result<(), AdminError> {
    let (action, args) = rest.split_once(' ').unwrap_or((rest, ""));
    let parts = fields(args);
    match (action, parts.split_first()) {
        ("add", Some((topic_id, draft))) => {
            let item = admin
                .create_vocabulary(&TopicId::new(*topic_id), vocabulary_draft(draft))
                .await?;
            println!("Added \"{}\" ({}).", item.word, item.id);
        }
        ("edit", Some((id, draft))) => {
            let item = admin
                .update_vocabulary(&VocabularyId::new(*id), vocabulary_draft(draft))
                .await?;
            println!("Updated \"{}\".", item.word);
        }
        ("rm", Some((id, _))) => {
            admin.delete_vocabulary(&VocabularyId::new(*id)).await?;
            println!("Word deleted.");
        }
        _ => println!("Usage: word add|edit|rm ..."),
    }
    Ok(())
}

/// `SEARCH | ROLE | STATUS`, every field optional.
fn user_query(rest: &str) -> UserQuery {
    let parts = fields(rest);
    let role = match parts.get(1).copied() {
        Some("admin") => Some(Role::Admin),
        Some("user") => Some(Role::User),
        _ => None,
    };
    let status = match parts.get(2).copied() {
        Some("active") => Some(UserStatus::Active),
        Some("suspended") => Some(UserStatus::Suspended),
        Some("banned") => Some(UserStatus::Banned),
        Some("pending") => Some(UserStatus::Pending),
        _ => None,
    };
    UserQuery {
        search: parts.first().copied().unwrap_or_default().to_owned(),
        role,
        status,
    }
}

async fn list_users(admin: &AdminService, rest: &str) -> Result<(), AdminError> {
    for user in admin.list_users(&user_query(rest)).await? {
        println!(
            "{:>4}  {:<24} {:<28} {:<6} {}",
            user.id,
            user.display_name(),
            user.email,
            user.role,
            user.status
        );
    }
    Ok(())
}

async fn user_command(admin: &AdminService, rest: &str) -> Result<(), AdminError> {
    if let Some(id) = rest.strip_prefix("rm ") {
        admin.delete_user(&UserId::new(id.trim())).await?;
        println!("User deleted.");
        return Ok(());
    }
    let user = admin.user(&UserId::new(rest.trim())).await?;
    println!("{} <{}>  {} / {}", user.display_name(), user.email, user.role, user.status);
    println!(
        "Quizzes {}  words learned {}  average score {:.0}%",
        user.total_quizzes, user.words_learned, user.average_score
    );
    if let Some(joined) = user.date_joined {
        println!("Joined {}", joined.format("%Y-%m-%d"));
    }
    Ok(())
}
