use super::*;

#[test]
fn it_ignores_plain_text() {
    assert_eq!(SlashCommand::parse("what is the total?"), None);
    assert_eq!(SlashCommand::parse(""), None);
}

#[test]
fn it_parses_aliases() {
    assert!(SlashCommand::parse("/n").unwrap().is_new());
    assert!(SlashCommand::parse("/NEW").unwrap().is_new());
    assert!(SlashCommand::parse("/exit").unwrap().is_quit());
    assert!(SlashCommand::parse(" /q ").unwrap().is_quit());
    assert!(SlashCommand::parse("/h").unwrap().is_help());
    assert!(SlashCommand::parse("/clear").unwrap().is_clear());
    assert!(!SlashCommand::parse("/clearall").unwrap().is_clear());
}

#[test]
fn it_parses_index_argument() {
    let command = SlashCommand::parse("/switch 3").unwrap();
    assert!(command.is_switch());
    assert_eq!(command.index_arg(), Some(2));

    assert_eq!(SlashCommand::parse("/d 0").unwrap().index_arg(), None);
    assert_eq!(SlashCommand::parse("/d x").unwrap().index_arg(), None);
    assert_eq!(SlashCommand::parse("/d").unwrap().index_arg(), None);
}

#[test]
fn it_splits_upload_path_from_question() {
    let command = SlashCommand::parse("/upload ./march.pdf what is the total due").unwrap();
    assert!(command.is_upload());
    assert_eq!(command.args[0], "./march.pdf");
    assert_eq!(command.trailing_text(), "what is the total due");

    let command = SlashCommand::parse("/u ./march.pdf").unwrap();
    assert_eq!(command.trailing_text(), "");
}
