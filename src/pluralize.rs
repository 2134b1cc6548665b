//! Russian noun agreement for the view counter label.

/// Form of "просмотр" that agrees with `count`.
pub fn pluralize_views(count: u64) -> &'static str {
    let last_digit = count % 10;
    let last_two = count % 100;

    if (11..=14).contains(&last_two) {
        return "просмотров";
    }
    match last_digit {
        1 => "просмотр",
        2..=4 => "просмотра",
        _ => "просмотров",
    }
}
