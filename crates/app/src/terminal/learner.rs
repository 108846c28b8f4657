use services::{AppServices, Dashboard, NavigationError, Navigator, Transition, View};
use wordify_core::model::{
    HistoryFilter, HistoryQuery, HistorySort, QUESTION_COUNT_CHOICES, QuizConfig, QuizMode,
    QuizSessionId, Topic, User, DEFAULT_QUESTION_COUNT,
};
use wordify_core::time::format_clock;

use super::{Exit, Prompt};

/// Outcome of one screen: keep going or leave the shell.
type Step = anyhow::Result<Option<Exit>>;

struct Shell<'a> {
    app: &'a AppServices,
    user: &'a User,
    nav: Navigator,
    /// Dashboard and the refresh epoch it was loaded for.
    dashboard: Option<(u64, Dashboard)>,
    history_query: HistoryQuery,
}

pub async fn run(app: &AppServices, user: &User, prompt: &mut Prompt) -> anyhow::Result<Exit> {
    let mut shell = Shell {
        app,
        user,
        nav: Navigator::new(),
        dashboard: None,
        history_query: HistoryQuery::default(),
    };
    loop {
        let step = match shell.nav.view().clone() {
            View::Topics => shell.topics(prompt).await,
            View::Learning { topic } => shell.learning(prompt, &topic).await,
            View::QuizSetup { topic } => shell.quiz_setup(prompt, &topic).await,
            View::Quiz { topic, config } => shell.quiz(prompt, &topic, config).await,
            View::QuizResult { session_id, topic } => {
                shell.result(prompt, &session_id, topic.is_some()).await
            }
            View::QuizHistory => shell.history(prompt).await,
        }?;
        if let Some(exit) = step {
            return Ok(exit);
        }
    }
}

fn go(transition: Result<Transition, NavigationError>) {
    if let Err(err) = transition {
        tracing::error!(error = %err, "navigation precondition failed");
        println!("{err}");
    }
}

fn parse_filter(raw: &str) -> Option<HistoryFilter> {
    match raw {
        "all" => Some(HistoryFilter::All),
        "excellent" => Some(HistoryFilter::Excellent),
        "good" => Some(HistoryFilter::Good),
        "practice" | "needs-practice" => Some(HistoryFilter::NeedsPractice),
        _ => None,
    }
}

fn parse_sort(raw: &str) -> Option<HistorySort> {
    match raw {
        "date" => Some(HistorySort::Date),
        "score" => Some(HistorySort::Score),
        "accuracy" => Some(HistorySort::Accuracy),
        "topic" => Some(HistorySort::Topic),
        _ => None,
    }
}

impl Shell<'_> {
    // ─── TOPICS ────────────────────────────────────────────────────────────────

    async fn load_dashboard(&mut self) {
        let epoch = self.nav.refresh_epoch();
        if self.dashboard.as_ref().is_some_and(|(e, _)| *e == epoch) {
            return;
        }
        let token = self.nav.token();
        match self.app.dashboard().load(self.user).await {
            Ok(loaded) => {
                self.dashboard = self.nav.accept(token, loaded).map(|d| (epoch, d));
            }
            Err(err) => println!("Could not load topics: {}", err.user_message()),
        }
    }

    async fn topics(&mut self, prompt: &mut Prompt) -> Step {
        self.load_dashboard().await;
        if let Some((_, dashboard)) = &self.dashboard {
            let overall = dashboard.overall;
            println!(
                "\nOverall: {}/{} words mastered ({}%), {} learning, {} not started",
                overall.mastered,
                overall.total_words,
                overall.overall_progress_rounded(),
                overall.learning,
                overall.not_started,
            );
            if dashboard.topics.is_empty() {
                println!("No topics yet.");
            }
            for (i, card) in dashboard.topics.iter().enumerate() {
                let summary = &card.summary;
                println!(
                    "{:>3}. {:<20} {:>3}%  {}/{} mastered  [{}]",
                    i + 1,
                    card.topic.name,
                    summary.percentage_rounded(),
                    summary.mastered(),
                    summary.total(),
                    summary.tier().label(),
                );
            }
        }

        let Some(input) = prompt
            .ask("\n[l N] learn  [q N] quiz  [h]istory  [p]rofile  [pw] password  [r]efresh  [o] logout  [x] exit > ")
            .await?
        else {
            return Ok(Some(Exit::Quit));
        };
        let (command, arg) = input.split_once(' ').unwrap_or((input.as_str(), ""));
        match command {
            "l" | "q" => {
                let topic = self.pick_topic(arg);
                match (command, topic) {
                    (_, None) => println!("Pick a topic by its number."),
                    ("l", Some(topic)) => go(self.nav.select_topic(topic)),
                    (_, Some(topic)) => go(self.nav.quiz_topic(topic)),
                }
            }
            "h" => {
                self.nav.view_history();
            }
            "p" => self.show_profile().await,
            "pw" => self.change_password(prompt).await?,
            "r" => self.dashboard = None,
            "o" => return Ok(Some(Exit::Logout)),
            "x" => return Ok(Some(Exit::Quit)),
            _ => println!("Unknown command."),
        }
        Ok(None)
    }

    fn pick_topic(&self, arg: &str) -> Option<Topic> {
        let index = arg.trim().parse::<usize>().ok()?.checked_sub(1)?;
        self.dashboard
            .as_ref()
            .and_then(|(_, d)| d.topic(index))
            .cloned()
    }

    async fn show_profile(&self) {
        match self.app.auth().profile().await {
            Ok(user) => {
                println!("\n{} <{}>", user.display_name(), user.email);
                println!("Quizzes taken: {}", user.total_quizzes);
                println!("Words learned: {}", user.words_learned);
                println!("Average score: {:.0}%", user.average_score);
                if !user.bio.is_empty() {
                    println!("{}", user.bio);
                }
            }
            Err(err) => println!("{}", err.user_message()),
        }
    }

    async fn change_password(&self, prompt: &mut Prompt) -> anyhow::Result<()> {
        let Some(current) = prompt.ask("Current password: ").await? else { return Ok(()) };
        let Some(new) = prompt.ask("New password: ").await? else { return Ok(()) };
        let Some(confirm) = prompt.ask("Confirm new password: ").await? else { return Ok(()) };
        match self.app.auth().change_password(&current, &new, &confirm).await {
            Ok(()) => println!("Password updated."),
            Err(err) => println!("{}", err.user_message()),
        }
        Ok(())
    }

    // ─── LEARNING ──────────────────────────────────────────────────────────────

    async fn learning(&mut self, prompt: &mut Prompt, topic: &Topic) -> Step {
        let learning = self.app.learning();
        let mut pass = match learning.start(topic).await {
            Ok(pass) => pass,
            Err(err) => {
                println!("{}", err.user_message());
                self.nav.back();
                return Ok(None);
            }
        };
        println!("\nLearning {} ({} words)", topic.name, pass.len());

        loop {
            while let Some(item) = pass.current().cloned() {
                println!("\n[{}/{}] {}  {}", pass.position() + 1, pass.len(), item.word, item.pronunciation);
                let Some(input) = prompt.ask("Enter to flip, b to go back > ").await? else {
                    return Ok(Some(Exit::Quit));
                };
                if input == "b" {
                    self.nav.back();
                    return Ok(None);
                }
                println!("  {} ({})", item.meaning, item.difficulty);
                if !item.example.is_empty() {
                    println!("  \"{}\"", item.example);
                }

                let knew = loop {
                    let Some(answer) = prompt.ask("Did you know it? [y/n] > ").await? else {
                        return Ok(Some(Exit::Quit));
                    };
                    match answer.as_str() {
                        "y" | "yes" => break true,
                        "n" | "no" => break false,
                        _ => {}
                    }
                };
                let outcome = learning.record_answer(self.user, &mut pass, knew).await?;
                if !outcome.progress_saved {
                    println!("(progress for \"{}\" could not be saved)", outcome.word);
                }
            }

            let summary = pass.summary()?;
            println!("\n{}", summary.tier.message());
            println!(
                "{}/{} known ({}%) in {}, about {}s per word",
                summary.correct,
                summary.total,
                summary.accuracy,
                format_clock(summary.total_time_secs),
                summary.average_time_secs,
            );

            let Some(input) = prompt.ask("[r]estart  [q]uiz  [b]ack > ").await? else {
                return Ok(Some(Exit::Quit));
            };
            match input.as_str() {
                "r" => learning.restart(&mut pass),
                "q" => {
                    go(self.nav.start_quiz());
                    return Ok(None);
                }
                _ => {
                    self.nav.back();
                    return Ok(None);
                }
            }
        }
    }

    // ─── QUIZ ──────────────────────────────────────────────────────────────────

    async fn quiz_setup(&mut self, prompt: &mut Prompt, topic: &Topic) -> Step {
        println!("\nQuiz setup: {} ({} words)", topic.name, topic.vocabulary_count);
        let choices: Vec<String> = QUESTION_COUNT_CHOICES.iter().map(u32::to_string).collect();
        let count = loop {
            let label = format!("Questions [{}] (default {DEFAULT_QUESTION_COUNT}, b to go back) > ", choices.join("/"));
            let Some(input) = prompt.ask(&label).await? else {
                return Ok(Some(Exit::Quit));
            };
            if input == "b" {
                self.nav.back();
                return Ok(None);
            }
            if input.is_empty() {
                break DEFAULT_QUESTION_COUNT;
            }
            match input.parse::<u32>() {
                Ok(n) if QUESTION_COUNT_CHOICES.contains(&n) => break n,
                _ => println!("Choose one of {}.", choices.join(", ")),
            }
        };
        let mode = loop {
            let Some(input) = prompt.ask("Mode [mc/typing] (default mc) > ").await? else {
                return Ok(Some(Exit::Quit));
            };
            if input.is_empty() {
                break QuizMode::default();
            }
            match input.parse::<QuizMode>() {
                Ok(mode) => break mode,
                Err(err) => println!("{err}"),
            }
        };
        go(self.nav.complete_setup(QuizConfig::new(count, mode)?));
        Ok(None)
    }

    async fn quiz(&mut self, prompt: &mut Prompt, topic: &Topic, config: QuizConfig) -> Step {
        let quiz = self.app.quiz_loop();
        let mut run = match quiz.start(topic, config).await {
            Ok(run) => run,
            Err(err) => {
                println!("{}", err.user_message());
                self.nav.back();
                return Ok(None);
            }
        };
        let clock = quiz.clock();

        while let Some(question) = run.current().cloned() {
            println!(
                "\nQuestion {}/{}  ({})  score {}",
                run.position() + 1,
                run.len(),
                format_clock(run.elapsed_secs(clock.now())),
                run.correct_so_far(),
            );
            println!("  {}", question.vocabulary.meaning);
            for (i, option) in question.options.iter().enumerate() {
                println!("  {}) {option}", i + 1);
            }

            loop {
                let Some(input) = prompt.ask("> ").await? else {
                    return Ok(Some(Exit::Quit));
                };
                let answer = input
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| question.options.get(i))
                    .cloned()
                    .unwrap_or(input);
                match quiz.answer(&mut run, &answer) {
                    Ok(feedback) if feedback.correct => {
                        println!("Correct!");
                        break;
                    }
                    Ok(feedback) => {
                        println!("Incorrect. The answer was \"{}\".", feedback.correct_answer);
                        break;
                    }
                    Err(err) => println!("{}", err.user_message()),
                }
            }
            if run.is_finished() || !run.advance()? {
                break;
            }
        }

        loop {
            match quiz.submit(self.user, &run).await {
                Ok(submitted) => {
                    go(self.nav.complete_quiz(submitted.session_id));
                    return Ok(None);
                }
                Err(err) => {
                    println!("Could not save your quiz: {}", err.user_message());
                    let Some(input) = prompt.ask("[r]etry  [b]ack > ").await? else {
                        return Ok(Some(Exit::Quit));
                    };
                    if input != "r" {
                        self.nav.back();
                        return Ok(None);
                    }
                }
            }
        }
    }

    async fn result(&mut self, prompt: &mut Prompt, session_id: &QuizSessionId, can_retake: bool) -> Step {
        match self.app.quiz_history().session(self.user, session_id).await {
            Ok(detail) => {
                let result = detail.result;
                println!("\n{}  {}", detail.record.topic_name, result.headline().message());
                println!(
                    "Score {}/{}  accuracy {}%  [{}]",
                    result.score(),
                    result.total_questions(),
                    result.accuracy_rounded(),
                    result.tier().label(),
                );
                println!(
                    "Time {}  ({}s per question)",
                    format_clock(result.time_spent_secs()),
                    result.average_time_per_item(),
                );
                for question in &detail.record.questions {
                    let mark = if question.is_correct() == Some(true) { "+" } else { "-" };
                    println!(
                        "  {mark} {:<16} you: {}",
                        question.correct_answer,
                        question.user_answer().unwrap_or("(no answer)"),
                    );
                }
            }
            Err(err) => println!("{}", err.user_message()),
        }

        let label = if can_retake {
            "[r]etake  [h]istory  [b]ack > "
        } else {
            "[h]istory  [b]ack > "
        };
        let Some(input) = prompt.ask(label).await? else {
            return Ok(Some(Exit::Quit));
        };
        match input.as_str() {
            "r" if can_retake => go(self.nav.retake_quiz()),
            "h" => {
                self.nav.view_history();
            }
            _ => {
                self.nav.back();
            }
        }
        Ok(None)
    }

    // ─── HISTORY ───────────────────────────────────────────────────────────────

    async fn history(&mut self, prompt: &mut Prompt) -> Step {
        let page = match self.app.quiz_history().history(self.user, &self.history_query).await {
            Ok(page) => page,
            Err(err) => {
                println!("{}", err.user_message());
                self.nav.back();
                return Ok(None);
            }
        };

        match page.stats {
            Some(stats) => println!(
                "\n{} quizzes  avg score {}  avg accuracy {}%  best {}  total time {}",
                stats.total_quizzes,
                stats.average_score,
                stats.average_accuracy,
                stats.best_score,
                format_clock(u32::try_from(stats.total_time_spent_secs).unwrap_or(u32::MAX)),
            ),
            None => println!("\nNo quizzes yet."),
        }
        for (i, session) in page.sessions.iter().enumerate() {
            let when = session
                .completed_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default();
            let accuracy = session.result().map(|r| r.accuracy_rounded()).unwrap_or(0);
            println!(
                "{:>3}. {:<20} {}/{}  {accuracy}%  {when}",
                i + 1,
                session.topic_name,
                session.correct_answers,
                session.total_questions,
            );
        }

        let Some(input) = prompt
            .ask("\n[N] open  [s text] search  [f all|excellent|good|practice]  [o date|score|accuracy|topic]  [b]ack > ")
            .await?
        else {
            return Ok(Some(Exit::Quit));
        };
        let (command, arg) = input.split_once(' ').unwrap_or((input.as_str(), ""));
        if let Ok(n) = command.parse::<usize>() {
            match n.checked_sub(1).and_then(|i| page.sessions.get(i)) {
                Some(session) => go(self.nav.view_result(session.id.clone())),
                None => println!("No quiz with that number."),
            }
            return Ok(None);
        }
        match command {
            "s" => arg.trim().clone_into(&mut self.history_query.search),
            "f" => match parse_filter(arg.trim()) {
                Some(filter) => self.history_query.filter = filter,
                None => println!("Unknown filter."),
            },
            "o" => match parse_sort(arg.trim()) {
                Some(sort) => self.history_query.sort = sort,
                None => println!("Unknown sort."),
            },
            "b" => {
                self.nav.back();
            }
            _ => println!("Unknown command."),
        }
        Ok(None)
    }
}
