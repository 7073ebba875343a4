use devtodo_core::{
    AddTaskOutcome, Category, CategoryKey, CheckState, NoticeLevel, PanelConfig, TaskDocument,
    TaskHost, TaskPanel, TaskStore, ToggleOutcome, ADD_TASK_COMMAND, NO_WORKSPACE_MESSAGE,
};
use std::cell::Cell;
use std::collections::VecDeque;
use std::fs;
use std::rc::Rc;

#[derive(Default)]
struct ScriptedHost {
    text_answers: VecDeque<Option<String>>,
    category_answer: Option<Category>,
    prompts: Vec<String>,
    notices: Vec<(NoticeLevel, String)>,
}

impl ScriptedHost {
    fn answering(task: Option<&str>, note: Option<&str>, category: Option<Category>) -> Self {
        Self {
            text_answers: VecDeque::from(vec![task.map(String::from), note.map(String::from)]),
            category_answer: category,
            ..Self::default()
        }
    }
}

impl TaskHost for ScriptedHost {
    fn prompt_text(&mut self, prompt: &str, _placeholder: Option<&str>) -> Option<String> {
        self.prompts.push(prompt.to_string());
        self.text_answers.pop_front().flatten()
    }

    fn pick_category(&mut self, placeholder: &str, options: &[Category]) -> Option<Category> {
        self.prompts.push(placeholder.to_string());
        assert_eq!(options, &Category::ALL);
        self.category_answer
    }

    fn notify(&mut self, level: NoticeLevel, message: &str) {
        self.notices.push((level, message.to_string()));
    }
}

fn workspace() -> (tempfile::TempDir, PanelConfig) {
    let dir = tempfile::tempdir().unwrap();
    let config = PanelConfig::for_workspace(dir.path());
    (dir, config)
}

fn read_json(path: &std::path::Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn change_counter(panel: &mut TaskPanel<ScriptedHost>) -> Rc<Cell<usize>> {
    let count = Rc::new(Cell::new(0));
    let observed = Rc::clone(&count);
    panel.on_did_change(move || observed.set(observed.get() + 1));
    count
}

#[test]
fn add_then_check_scenario_round_trips_to_empty() {
    let (_dir, config) = workspace();
    let host = ScriptedHost::answering(
        Some("  Review API "),
        Some("tomorrow"),
        Some(Category::DiscussWithTeam),
    );
    let mut panel = TaskPanel::from_config(&config, host);
    let changes = change_counter(&mut panel);

    let outcome = panel.run_command(ADD_TASK_COMMAND).unwrap();
    let AddTaskOutcome::Added { category, id } = outcome else {
        panic!("expected task to be added");
    };
    assert_eq!(category, Category::DiscussWithTeam);
    assert_eq!(changes.get(), 1);
    assert_eq!(
        panel.host().notices,
        vec![(NoticeLevel::Info, "Task added to Discuss with Team!".to_string())]
    );

    let key = CategoryKey::Known(Category::DiscussWithTeam);
    let children = panel.children(&key);
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].label, "Review API (tomorrow)");
    assert_eq!(children[0].task_id, id);

    let stored = panel.store().unwrap().load().unwrap();
    let record = &stored.tasks(Category::DiscussWithTeam)[0];
    assert_eq!(record.task, "Review API");
    assert_eq!(record.date, "tomorrow");
    assert!(!record.completed);

    let toggled = panel.on_check_state_changed(&key, &children[0].task_id, CheckState::Checked);
    assert_eq!(toggled, ToggleOutcome::Removed);
    assert_eq!(changes.get(), 2);
    assert!(panel.children(&key).is_empty());
    assert_eq!(panel.store().unwrap().load().unwrap(), TaskDocument::new());
}

#[test]
fn prompts_are_asked_in_order() {
    let (_dir, config) = workspace();
    let host = ScriptedHost::answering(Some("x"), Some(""), Some(Category::FeatureIdeas));
    let mut panel = TaskPanel::from_config(&config, host);

    panel.add_task();

    assert_eq!(
        panel.host().prompts,
        vec![
            "Enter a new task:".to_string(),
            "Enter a date or reminder (optional):".to_string(),
            "Select a category:".to_string(),
        ]
    );
    let doc = panel.store().unwrap().load().unwrap();
    assert_eq!(doc.tasks(Category::FeatureIdeas)[0].date, "No date");
}

#[test]
fn dismissed_or_blank_prompts_do_not_write() {
    let cases = [
        ScriptedHost::answering(None, Some("n"), Some(Category::Miscellaneous)),
        ScriptedHost::answering(Some("   "), Some("n"), Some(Category::Miscellaneous)),
        ScriptedHost::answering(Some("task"), None, Some(Category::Miscellaneous)),
        ScriptedHost::answering(Some("task"), Some("n"), None),
    ];

    for host in cases {
        let (_dir, config) = workspace();
        let mut panel = TaskPanel::from_config(&config, host);
        let changes = change_counter(&mut panel);

        assert_eq!(panel.add_task(), AddTaskOutcome::Cancelled);
        assert!(!config.data_file_path().unwrap().exists());
        assert!(panel.host().notices.is_empty());
        assert_eq!(changes.get(), 0);
    }
}

#[test]
fn no_workspace_notifies_and_shows_nothing() {
    let host = ScriptedHost::answering(Some("t"), Some("n"), Some(Category::FeatureIdeas));
    let mut panel = TaskPanel::from_config(&PanelConfig::default(), host);

    assert_eq!(panel.add_task(), AddTaskOutcome::NoWorkspace);
    assert_eq!(
        panel.host().notices,
        vec![(NoticeLevel::Info, NO_WORKSPACE_MESSAGE.to_string())]
    );
    assert!(panel.host().prompts.is_empty());
    assert!(panel.roots().is_empty());
    assert_eq!(
        panel.on_check_state_changed(&Category::FeatureIdeas.into(), "id", CheckState::Checked),
        ToggleOutcome::NoWorkspace
    );
}

#[test]
fn corrupt_file_surfaces_empty_view_and_error_notice() {
    let (dir, config) = workspace();
    fs::create_dir_all(dir.path().join(".vscode")).unwrap();
    let path = config.data_file_path().unwrap();
    fs::write(&path, "definitely not json").unwrap();

    let host = ScriptedHost::answering(Some("t"), Some("n"), Some(Category::FeatureIdeas));
    let mut panel = TaskPanel::from_config(&config, host);

    assert!(panel.roots().is_empty());
    assert_eq!(panel.host().notices.len(), 1);
    assert_eq!(panel.host().notices[0].0, NoticeLevel::Error);

    assert_eq!(panel.add_task(), AddTaskOutcome::Failed);
    assert_eq!(fs::read_to_string(&path).unwrap(), "definitely not json");
}

#[test]
fn hand_edited_blank_record_is_hidden() {
    let (dir, config) = workspace();
    fs::create_dir_all(dir.path().join(".vscode")).unwrap();
    fs::write(
        config.data_file_path().unwrap(),
        r#"{"featureIdeas": [], "completeLater": [], "discussWithTeam": [],
            "miscellaneous": [{"id": "m1", "task": "", "date": "No date", "completed": false}]}"#,
    )
    .unwrap();

    let mut panel = TaskPanel::from_config(&config, ScriptedHost::default());
    assert_eq!(panel.roots().len(), 4);
    assert!(panel
        .children(&Category::Miscellaneous.into())
        .is_empty());
    assert!(panel.host().notices.is_empty());
}

#[test]
fn checking_missing_task_is_noop() {
    let (_dir, config) = workspace();
    let store = TaskStore::new(config.data_file_path().unwrap());
    let mut doc = TaskDocument::new();
    doc.add_task(Category::CompleteLater, "stay", None);
    store.save(&doc).unwrap();

    let mut panel = TaskPanel::new(Some(store.clone()), ScriptedHost::default());
    let changes = change_counter(&mut panel);

    let outcome =
        panel.on_check_state_changed(&Category::CompleteLater.into(), "gone", CheckState::Checked);
    assert_eq!(outcome, ToggleOutcome::NotFound);
    assert_eq!(changes.get(), 0);
    assert_eq!(store.load().unwrap(), doc);
}

#[test]
fn unchecking_is_ignored() {
    let (_dir, config) = workspace();
    let mut panel = TaskPanel::from_config(&config, ScriptedHost::default());
    let outcome =
        panel.on_check_state_changed(&Category::CompleteLater.into(), "id", CheckState::Unchecked);
    assert_eq!(outcome, ToggleOutcome::Ignored);
    assert!(!config.data_file_path().unwrap().exists());
}

#[test]
fn unknown_command_is_not_handled() {
    let (_dir, config) = workspace();
    let mut panel = TaskPanel::from_config(&config, ScriptedHost::default());
    assert_eq!(panel.run_command("dev-todo-list.other"), None);
}

#[test]
fn legacy_and_id_less_records_can_be_checked_off() {
    let (dir, config) = workspace();
    fs::create_dir_all(dir.path().join(".vscode")).unwrap();
    fs::write(
        config.data_file_path().unwrap(),
        r#"{"featureIdeas": ["dark mode"], "completeLater": [{"task": "no id"}]}"#,
    )
    .unwrap();

    let mut panel = TaskPanel::from_config(&config, ScriptedHost::default());
    let changes = change_counter(&mut panel);

    let legacy_key = CategoryKey::Known(Category::FeatureIdeas);
    let legacy = panel.children(&legacy_key);
    assert_eq!(legacy.len(), 1);
    assert_eq!(
        panel.on_check_state_changed(&legacy_key, &legacy[0].task_id, CheckState::Checked),
        ToggleOutcome::Removed
    );
    assert!(panel.children(&legacy_key).is_empty());

    let idless_key = CategoryKey::Known(Category::CompleteLater);
    let idless = panel.children(&idless_key);
    assert_eq!(idless.len(), 1);
    assert_eq!(
        panel.on_check_state_changed(&idless_key, &idless[0].task_id, CheckState::Checked),
        ToggleOutcome::Removed
    );

    assert_eq!(changes.get(), 2);
    assert_eq!(panel.store().unwrap().load().unwrap(), TaskDocument::new());
}

#[test]
fn hand_edited_unknown_group_survives_add_and_check() {
    let (dir, config) = workspace();
    fs::create_dir_all(dir.path().join(".vscode")).unwrap();
    let path = config.data_file_path().unwrap();
    fs::write(
        &path,
        r#"{"someday": "keep this note", "later": [{"task": "loose", "owner": "ana"}, 7],
            "featureIdeas": []}"#,
    )
    .unwrap();

    let host = ScriptedHost::answering(Some("ship"), Some(""), Some(Category::FeatureIdeas));
    let mut panel = TaskPanel::from_config(&config, host);
    let AddTaskOutcome::Added { id, .. } = panel.add_task() else {
        panic!("expected task to be added");
    };
    assert_eq!(
        panel.on_check_state_changed(&Category::FeatureIdeas.into(), &id, CheckState::Checked),
        ToggleOutcome::Removed
    );

    let value = read_json(&path);
    assert_eq!(value["someday"], "keep this note");
    assert_eq!(
        value["later"],
        serde_json::json!([{"task": "loose", "owner": "ana"}, 7])
    );

    let later = CategoryKey::Other("later".to_string());
    let children = panel.children(&later);
    assert_eq!(children.len(), 1);
    assert_eq!(
        panel.on_check_state_changed(&later, &children[0].task_id, CheckState::Checked),
        ToggleOutcome::Removed
    );
    let value = read_json(&path);
    assert_eq!(value["later"], serde_json::json!([7]));
    assert_eq!(value["someday"], "keep this note");
}
