use super::*;

#[test]
fn test_rules_follow_domain_priority() {
    let order: Vec<Domain> = RULES.iter().map(|rule| rule.domain).collect();
    assert_eq!(order, Domain::PRIORITY.to_vec());
}

#[test]
fn test_rule_for_echo_is_none() {
    assert!(rule_for(Domain::Echo).is_none());
    assert!(rule_for(Domain::Web).is_some());
}

#[test]
fn test_file_create() {
    assert_eq!(
        Classifier::classify("Создать файл test.txt с текстом 'Hello World'"),
        Domain::File
    );
}

#[test]
fn test_file_english() {
    assert_eq!(Classifier::classify("read file notes.txt"), Domain::File);
    assert_eq!(Classifier::classify("delete file report.csv"), Domain::File);
}

#[test]
fn test_file_extension_trigger() {
    assert_eq!(Classifier::classify("data.json"), Domain::File);
}

#[test]
fn test_windows_calculator_override() {
    assert_eq!(Classifier::classify("Открыть калькулятор"), Domain::Windows);
    assert_eq!(Classifier::classify("open the calculator"), Domain::Windows);
}

#[test]
fn test_windows_launch_word() {
    assert_eq!(Classifier::classify("Запустить paint"), Domain::Windows);
    assert_eq!(Classifier::classify("launch notepad"), Domain::Windows);
}

#[test]
fn test_browser_excludes_windows() {
    assert_eq!(
        Classifier::classify("open the browser and launch calc"),
        Domain::Web
    );
    assert_eq!(Classifier::classify("Запустить браузер"), Domain::Web);
}

#[test]
fn test_windows_rule_rejects_browser_launch() {
    let rule = rule_for(Domain::Windows).unwrap();
    assert!(!rule.claims("launch browser"));
    assert!(!rule.claims("запустить браузер"));
    assert!(rule.claims("launch calc"));
}

#[test]
fn test_windows_keyword_vetoed_by_browser() {
    let rule = rule_for(Domain::Windows).unwrap();
    assert!(!rule.claims("calculator in the browser"));
}

#[test]
fn test_auth_register_and_login() {
    assert_eq!(
        Classifier::classify("Зарегистрировать пользователя test_user с паролем password123"),
        Domain::Auth
    );
    assert_eq!(
        Classifier::classify("Войти как пользователь test_user с паролем password123"),
        Domain::Auth
    );
    assert_eq!(Classifier::classify("Проверить права доступа"), Domain::Auth);
}

#[test]
fn test_auth_english() {
    assert_eq!(
        Classifier::classify("register user alice with password secret1"),
        Domain::Auth
    );
    assert_eq!(
        Classifier::classify("log in as alice with password secret1"),
        Domain::Auth
    );
}

#[test]
fn test_create_user_is_shadowed_by_file() {
    assert_eq!(Classifier::classify("Создать пользователя bob"), Domain::File);
}

#[test]
fn test_web_search_override() {
    assert_eq!(Classifier::classify("Найти в поисковике 'Python TDD'"), Domain::Web);
}

#[test]
fn test_web_keywords() {
    assert_eq!(Classifier::classify("search duckduckgo for 'rust'"), Domain::Web);
    assert_eq!(Classifier::classify("Открыть сайт example.com"), Domain::Web);
}

#[test]
fn test_vision_screenshot() {
    assert_eq!(Classifier::classify("Сделать снимок экрана"), Domain::Vision);
    assert_eq!(Classifier::classify("take a screenshot"), Domain::Vision);
}

#[test]
fn test_vision_find_icon() {
    assert_eq!(Classifier::classify("Найти иконку проводник"), Domain::Vision);
    assert_eq!(Classifier::classify("find the icon Trash"), Domain::Vision);
}

#[test]
fn test_vision_keyword_excluded_by_web() {
    let rule = rule_for(Domain::Vision).unwrap();
    assert!(!rule.claims("скриншот сайта"));
    assert_eq!(Classifier::classify("скриншот сайта"), Domain::Web);
}

#[test]
fn test_vision_override_ignores_exclusion() {
    let rule = rule_for(Domain::Vision).unwrap();
    assert!(rule.claims("сделать снимок сайта"));
}

#[test]
fn test_orchestration() {
    assert_eq!(
        Classifier::classify("Координация нескольких моделей"),
        Domain::ModelOrchestration
    );
    assert_eq!(
        Classifier::classify("run a sequential pipeline of models"),
        Domain::ModelOrchestration
    );
}

#[test]
fn test_orchestration_override() {
    let rule = rule_for(Domain::ModelOrchestration).unwrap();
    assert!(matches!(
        rule.match_normalized("llm должна сохранить итог"),
        Some(RuleMatch::Override(_))
    ));
}

#[test]
fn test_orchestration_simple_search_excluded() {
    let rule = rule_for(Domain::ModelOrchestration).unwrap();
    assert!(!rule.claims("найти модели на сайте"));
    assert!(rule.claims("найти модели и проанализировать на сайте"));
}

#[test]
fn test_echo_fallback() {
    assert_eq!(Classifier::classify("hello there"), Domain::Echo);
    assert_eq!(Classifier::classify(""), Domain::Echo);
}

#[test]
fn test_case_insensitive() {
    assert_eq!(Classifier::classify("ОТКРЫТЬ КАЛЬКУЛЯТОР"), Domain::Windows);
    assert_eq!(Classifier::classify("OPEN THE BROWSER"), Domain::Web);
}

#[test]
fn test_deterministic() {
    let descriptions = [
        "Создать файл a.txt",
        "Открыть калькулятор",
        "Найти в поисковике 'Python TDD'",
        "something unrelated",
    ];
    for description in descriptions {
        assert_eq!(
            Classifier::classify(description),
            Classifier::classify(description)
        );
    }
}

#[test]
fn test_keyword_match_reports_trigger() {
    let rule = rule_for(Domain::File).unwrap();
    assert_eq!(
        rule.match_normalized("удалить файл a.txt"),
        Some(RuleMatch::Keyword("удалить файл"))
    );
}

#[test]
fn test_override_pattern_rejection_uses_capture() {
    let pattern = OverridePattern::rejecting(r"launch\s+(\w+)", BROWSER_TRIGGERS);
    assert!(!pattern.is_match("launch browser"));
    assert!(pattern.is_match("launch browser then launch calc"));
    assert!(pattern.is_match("launch gimp"));
}

#[test]
fn test_simple_web_search_veto_is_shadowed_by_web() {
    let text = "find the pipeline docs on the website";
    let orchestration = rule_for(Domain::ModelOrchestration).unwrap();
    assert!(!orchestration.claims(text));
    assert_eq!(Classifier::classify(text), Domain::Web);
}

#[test]
fn test_english_find_analyze_save_is_orchestration() {
    assert_eq!(
        Classifier::classify("run the llm pipeline: find data, analyze it and save"),
        Domain::ModelOrchestration
    );
    assert_eq!(
        Classifier::classify("найти данные, выполнить анализ и сохранить"),
        Domain::Web
    );
}
