//! Line-based interactive client.

mod admin;
mod learner;

use std::io::Write;

use services::AppServices;
use storage::demo::{DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD, DEMO_LEARNER_EMAIL, DEMO_LEARNER_PASSWORD};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use wordify_core::model::User;

/// How a signed-in shell ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Logout,
    Quit,
}

pub struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Print `label` and read one trimmed line. `None` at end of input.
    pub async fn ask(&mut self, label: &str) -> anyhow::Result<Option<String>> {
        print!("{label}");
        std::io::stdout().flush()?;
        Ok(self.lines.next_line().await?.map(|line| line.trim().to_owned()))
    }
}

pub async fn run(app: AppServices, token: Option<String>, offline: bool) -> anyhow::Result<()> {
    let mut prompt = Prompt::new();
    if offline {
        println!("Offline demo. Sign in as {DEMO_LEARNER_EMAIL} / {DEMO_LEARNER_PASSWORD}");
        println!("or as the administrator {DEMO_ADMIN_EMAIL} / {DEMO_ADMIN_PASSWORD}.");
    }

    let mut resumed = match token {
        Some(token) => match app.auth().resume(&token).await {
            Ok(user) => Some(user),
            Err(err) => {
                println!("Saved token was not accepted: {}", err.user_message());
                None
            }
        },
        None => None,
    };

    loop {
        let user = match resumed.take() {
            Some(user) => user,
            None => match sign_in(&app, &mut prompt).await? {
                Some(user) => user,
                None => return Ok(()),
            },
        };
        println!("\nWelcome, {}!", user.display_name());

        let exit = if user.is_admin() {
            admin::run(&app, &mut prompt).await?
        } else {
            learner::run(&app, &user, &mut prompt).await?
        };
        if exit == Exit::Quit {
            return Ok(());
        }
        app.auth().logout().await;
        println!("Signed out.");
    }
}

async fn sign_in(app: &AppServices, prompt: &mut Prompt) -> anyhow::Result<Option<User>> {
    let auth = app.auth();
    loop {
        let Some(choice) = prompt.ask("\n[l]ogin  [r]egister  [q]uit > ").await? else {
            return Ok(None);
        };
        let attempt = match choice.as_str() {
            "l" | "login" => {
                let Some(email) = prompt.ask("Email: ").await? else { return Ok(None) };
                let Some(password) = prompt.ask("Password: ").await? else { return Ok(None) };
                auth.login(&email, &password).await
            }
            "r" | "register" => {
                let Some(name) = prompt.ask("Full name: ").await? else { return Ok(None) };
                let Some(email) = prompt.ask("Email: ").await? else { return Ok(None) };
                let Some(password) = prompt.ask("Password: ").await? else { return Ok(None) };
                let Some(confirm) = prompt.ask("Confirm password: ").await? else { return Ok(None) };
                auth.register(&name, &email, &password, &confirm).await
            }
            "q" | "quit" => return Ok(None),
            _ => {
                println!("Unknown choice.");
                continue;
            }
        };
        match attempt {
            Ok(user) => return Ok(Some(user)),
            Err(err) => println!("{}", err.user_message()),
        }
    }
}

/// Split `a | b | c` into trimmed fields.
pub(crate) fn fields(input: &str) -> Vec<&str> {
    input.split('|').map(str::trim).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_are_trimmed() {
        assert_eq!(fields(" Travel | Trips abroad |#3B82F6 "), ["Travel", "Trips abroad", "#3B82F6"]);
        assert_eq!(fields("solo"), ["solo"]);
    }
}
