//! End-to-end scenarios through `Engine::create_task(..).execute()`.

mod common;

use std::sync::Arc;

use common::{
    engine_with, BrowserScript, FakeBrowserController, FakeLauncher, MemoryFileSystem,
};
use deskpilot_core::{CapabilityRegistry, Domain, Engine};

fn full_engine(browser: BrowserScript) -> (Engine, Arc<FakeLauncher>) {
    let launcher = Arc::new(FakeLauncher::default());
    let registry = CapabilityRegistry::new()
        .with_filesystem(Arc::new(MemoryFileSystem::default()))
        .with_process_launcher(launcher.clone())
        .with_browser_controller(Arc::new(FakeBrowserController::new(browser)));
    (engine_with(registry), launcher)
}

fn google_results() -> BrowserScript {
    BrowserScript::default().with_results(
        "h3",
        &[
            "Test-Driven Development with Python",
            "Python TDD Tutorial",
            "TDD in Python",
            "Fourth result",
        ],
    )
}

#[tokio::test]
async fn test_scenario_create_file() {
    let (engine, _) = full_engine(BrowserScript::default());
    let task = engine.create_task("Создать файл test.txt с текстом 'Hello World'");
    assert_eq!(task.domain(), Domain::File);

    let result = task.execute().await;
    assert!(result.success, "{}", result.details);
    assert!(result.details.contains("test.txt"));
    assert!(result.details.contains("Hello World"));
}

#[tokio::test]
async fn test_scenario_open_calculator() {
    let (engine, launcher) = full_engine(BrowserScript::default());
    let task = engine.create_task("Открыть калькулятор");
    assert_eq!(task.domain(), Domain::Windows);

    let result = task.execute().await;
    assert!(result.success, "{}", result.details);
    assert_eq!(result.details, "Calculator launched");
    assert_eq!(launcher.spawned.lock().len(), 1);
}

#[tokio::test]
async fn test_scenario_register_then_login() {
    let (engine, _) = full_engine(BrowserScript::default());

    let register =
        engine.create_task("Зарегистрировать пользователя test_user с паролем password123");
    assert_eq!(register.domain(), Domain::Auth);
    let result = register.execute().await;
    assert!(result.success, "{}", result.details);

    let login = engine.create_task("Войти как пользователь test_user с паролем password123");
    assert_eq!(login.domain(), Domain::Auth);
    let result = login.execute().await;
    assert!(result.success, "{}", result.details);

    let token = result
        .details
        .rsplit("Token: ")
        .next()
        .unwrap_or_default()
        .to_string();
    assert_eq!(token.len(), 64);
    assert_eq!(
        engine.auth().username_for_token(&token),
        Some("test_user".to_string())
    );
}

#[tokio::test]
async fn test_scenario_web_search() {
    let (engine, _) = full_engine(google_results());
    let task = engine.create_task("Найти в поисковике 'Python TDD'");
    assert_eq!(task.domain(), Domain::Web);

    let result = task.execute().await;
    assert!(result.success, "{}", result.details);
    assert!(result.details.lines().count() >= 3);
    assert_eq!(
        result.details,
        "1. Test-Driven Development with Python\n2. Python TDD Tutorial\n3. TDD in Python"
    );
}

#[tokio::test]
async fn test_scenario_web_search_behind_captcha() {
    let script = BrowserScript {
        page_source: "<div id=\"recaptcha\">unusual traffic</div>".to_string(),
        ..Default::default()
    };
    let (engine, _) = full_engine(script);
    let result = engine
        .create_task("Найти в поисковике 'Python TDD'")
        .execute()
        .await;
    assert!(result.success);
    assert!(result.details.contains("Bot protection"));
}

#[tokio::test]
async fn test_file_round_trip() {
    let (engine, _) = full_engine(BrowserScript::default());

    let created = engine
        .create_task("create file notes.txt with text \"Hello World\"")
        .execute()
        .await;
    assert!(created.success, "{}", created.details);

    let read = engine.create_task("read file notes.txt").execute().await;
    assert!(read.success);
    assert_eq!(read.details, "Hello World");

    let deleted = engine.create_task("delete file notes.txt").execute().await;
    assert!(deleted.success);
    assert_eq!(deleted.details, "File notes.txt deleted");

    let reread = engine.create_task("read file notes.txt").execute().await;
    assert!(!reread.success);
    assert!(reread.details.starts_with("Could not read file notes.txt"));
}

#[tokio::test]
async fn test_auth_properties() {
    let (engine, _) = full_engine(BrowserScript::default());
    let run = |description: &'static str| {
        let task = engine.create_task(description);
        async move { task.execute().await }
    };

    assert!(run("register user alice with password secret1").await.success);

    let duplicate = run("register user alice with password other").await;
    assert!(!duplicate.success);
    assert!(duplicate.details.contains("already exists"));

    let first = run("log in as alice with password secret1").await;
    assert!(first.success);

    let wrong = run("log in as alice with password wrong").await;
    assert!(!wrong.success);
    assert!(wrong.details.to_lowercase().contains("incorrect password"));

    let second = run("log in as alice with password secret1").await;
    assert!(second.success);
    assert_ne!(first.details, second.details);
}

#[tokio::test]
async fn test_browser_and_launch_goes_to_web() {
    let (engine, launcher) = full_engine(BrowserScript::default());
    let task = engine.create_task("open the browser and launch calc");
    assert_eq!(task.domain(), Domain::Web);

    let result = task.execute().await;
    assert!(result.success, "{}", result.details);
    assert_eq!(result.details, "Browser opened and navigated to Google");
    assert!(launcher.spawned.lock().is_empty());
}

#[tokio::test]
async fn test_unclaimed_description_echoes() {
    let (engine, _) = full_engine(BrowserScript::default());
    let result = engine.create_task("hello there").execute().await;
    assert!(result.success);
    assert_eq!(result.details, "Task completed: hello there");
}

#[tokio::test]
async fn test_orchestration_runs_without_capabilities() {
    let engine = engine_with(CapabilityRegistry::new());
    let result = engine
        .create_task("Последовательная обработка данных цепочкой моделей")
        .execute()
        .await;
    assert!(result.success);
    assert!(result.details.starts_with("Sequential processing finished."));
}

#[tokio::test]
async fn test_classification_is_deterministic_across_tasks() {
    let (engine, _) = full_engine(BrowserScript::default());
    for description in [
        "Создать файл test.txt с текстом 'Hello World'",
        "Открыть калькулятор",
        "Найти в поисковике 'Python TDD'",
        "Координация моделей",
    ] {
        let first = engine.create_task(description).domain();
        let second = engine.create_task(description).domain();
        assert_eq!(first, second);
        assert_eq!(first, engine.classify(description));
    }
}
