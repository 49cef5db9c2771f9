use rnexus::{Action, Flow, Locator};

#[test]
fn test_settings_flow_matches_maestro_syntax() {
    let flow = Flow::new("com.android.settings")
        .with_action(Action::LaunchApp)
        .with_action(Action::TapOn(Locator::text("Wi-Fi")))
        .with_action(Action::Wait(1.0))
        .with_action(Action::PressBack);

    let expected = "\
appId: com.android.settings
---
- launchApp
- tapOn:
    text: \"Wi-Fi\"
- wait: 1
- pressBack
";
    assert_eq!(flow.serialize(), expected);
}

#[test]
fn test_flow_with_every_action_kind() {
    let flow = Flow::new("com.example.app")
        .with_action(Action::LaunchApp)
        .with_action(Action::TapOn(Locator::id("login_button")))
        .with_action(Action::InputText {
            text: "user@example.com".to_string(),
            id: Some("email".to_string()),
        })
        .with_action(Action::Swipe {
            start: (500, 1500),
            end: (500, 300),
        })
        .with_action(Action::Wait(0.5))
        .with_action(Action::AssertVisible(Locator::text("Welcome")))
        .with_action(Action::TakeScreenshot("after_login".to_string()))
        .with_action(Action::RunScript("teardown.js".to_string()))
        .with_action(Action::PressBack);

    let expected = "\
appId: com.example.app
---
- launchApp
- tapOn:
    id: \"login_button\"
- inputText:
    text: \"user@example.com\"
    id: \"email\"
- swipe:
    start: \"500,1500\"
    end: \"500,300\"
- wait: 0.5
- assertVisible:
    text: \"Welcome\"
- takeScreenshot: \"after_login\"
- runScript: \"teardown.js\"
- pressBack
";
    assert_eq!(flow.serialize(), expected);
}

#[test]
fn test_nested_branches_three_levels() {
    let flow = Flow::new("com.example.app").with_action(Action::If {
        visible: Locator::text("Login"),
        then_actions: vec![Action::RunFlow {
            when_visible: Some(Locator::text("Password")),
            commands: vec![Action::If {
                visible: Locator::id("remember_me"),
                then_actions: vec![Action::TapOn(Locator::id("remember_me"))],
                else_actions: vec![Action::PressBack],
            }],
        }],
        else_actions: vec![Action::AssertVisible(Locator::text("Home"))],
    });

    let expected = "\
appId: com.example.app
---
- if:
    visible: \"Login\"
  then:
    - runFlow:
        when:
            visible: \"Password\"
        commands:
            - if:
                visible:
                    id: \"remember_me\"
              then:
                - tapOn:
                    id: \"remember_me\"
              else:
                - pressBack
  else:
    - assertVisible:
        text: \"Home\"
";
    assert_eq!(flow.serialize(), expected);
}

#[test]
fn test_quoted_text_stays_valid_yaml() {
    let flow = Flow::new("com.example.app")
        .with_action(Action::TapOn(Locator::text("say \"hi\"")))
        .with_action(Action::InputText {
            text: "back\\slash".to_string(),
            id: None,
        });
    let serialized = flow.serialize();
    assert!(serialized.contains("text: \"say \\\"hi\\\"\""));
    assert!(serialized.contains("text: \"back\\\\slash\""));
}

#[test]
fn test_write_and_reread() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.yaml");
    let flow = Flow::new("com.android.settings")
        .with_action(Action::LaunchApp)
        .with_action(Action::Wait(2.5));
    flow.write_to(&path).unwrap();
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("appId: com.android.settings\n---\n"));
    assert!(content.contains("- wait: 2.5\n"));
}
