use super::*;

/// Every char is 10px wide.
fn mono(text: &str) -> f32 {
    text.chars().count() as f32 * 10.0
}

#[test]
fn hello_world_fits_on_one_line() {
    let lines = wrap_line(&mut mono, "Hello world", 200.0);
    assert_eq!(lines, vec!["Hello world"]);
}

#[test]
fn hello_world_breaks_between_words() {
    // "Hello world" is 110px, each word is 50px.
    let lines = wrap_line(&mut mono, "Hello world", 80.0);
    assert_eq!(lines, vec!["Hello", "world"]);
}

#[test]
fn exact_fit_is_kept() {
    let lines = wrap_line(&mut mono, "Hello world", 110.0);
    assert_eq!(lines, vec!["Hello world"]);
}

#[test]
fn overlong_word_gets_its_own_line() {
    let lines = wrap_line(&mut mono, "a incomprehensibilities b", 60.0);
    assert_eq!(lines, vec!["a", "incomprehensibilities", "b"]);
}

#[test]
fn overlong_first_word_does_not_swallow_the_next() {
    let lines = wrap_line(&mut mono, "incomprehensibilities go on", 60.0);
    assert_eq!(lines, vec!["incomprehensibilities", "go on"]);
}

#[test]
fn no_line_exceeds_limit_unless_single_word() {
    let text = "the quick brown fox jumps over the lazy dog while seventeen \
                extraordinarily verbose paragraphs continue";
    for limit in [30.0f32, 55.0, 80.0, 120.0, 250.0] {
        for line in wrap_line(&mut mono, text, limit) {
            assert!(
                mono(&line) <= limit || !line.contains(' '),
                "line {line:?} exceeds {limit}"
            );
        }
    }
}

#[test]
fn blank_lines_are_preserved_once_each() {
    let lines = wrap_text(&mut mono, "one\n\n   \ntwo", 500.0);
    assert_eq!(lines, vec!["one", "", "", "two"]);
}

#[test]
fn empty_text_yields_no_lines() {
    assert!(wrap_text(&mut mono, "", 100.0).is_empty());
}

#[test]
fn layout_uses_padded_width_and_line_spacing() {
    let cfg = ScrollConfig {
        text: "aaaa bbbb cccc".to_owned(),
        width: 140,
        padding: 20.0,
        font_size: 10.0,
        line_height: 1.5,
        ..ScrollConfig::default()
    };
    // limit = (140 - 40) * 0.95 = 95px, so two words (90px) fit per line.
    assert!((wrap_limit(&cfg) - 95.0).abs() < 1e-4);

    let wrapped = WrappedText::layout(&mut mono, &cfg);
    assert_eq!(wrapped.lines, vec!["aaaa bbbb", "cccc"]);
    assert_eq!(wrapped.line_spacing, 15.0);
    assert_eq!(wrapped.total_height(), 30.0);
}
