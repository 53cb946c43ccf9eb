//! Reply keyboards and the button labels the message handler matches on.

use teloxide::types::{KeyboardButton, KeyboardMarkup};

use crate::trainer::Word;

pub const BTN_NEXT: &str = "Next ▶";
pub const BTN_ADD: &str = "Add word ➕";
pub const BTN_DELETE: &str = "Delete word ❌";

const DELETE_PREFIX: &str = "Delete: ";
const DELETE_ARROW: &str = " → ";

/// The persistent main menu.
pub fn main_menu() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![
        KeyboardButton::new(BTN_NEXT),
        KeyboardButton::new(BTN_ADD),
        KeyboardButton::new(BTN_DELETE),
    ]])
    .resize_keyboard()
}

/// Answer options two per row, with a Next button underneath.
pub fn question_options(options: &[String]) -> KeyboardMarkup {
    let mut rows: Vec<Vec<KeyboardButton>> = options
        .chunks(2)
        .map(|pair| pair.iter().cloned().map(KeyboardButton::new).collect())
        .collect();
    rows.push(vec![KeyboardButton::new(BTN_NEXT)]);
    KeyboardMarkup::new(rows).resize_keyboard()
}

/// One `Delete: src → tgt` button per subscribed word.
pub fn delete_list(words: &[Word]) -> KeyboardMarkup {
    let rows: Vec<Vec<KeyboardButton>> = words
        .iter()
        .map(|w| vec![KeyboardButton::new(delete_label(w))])
        .collect();
    KeyboardMarkup::new(rows).resize_keyboard()
}

pub fn delete_label(word: &Word) -> String {
    format!("{DELETE_PREFIX}{}{DELETE_ARROW}{}", word.source, word.target)
}

/// Parse a pressed delete button back into (source, target).
pub fn parse_delete_label(text: &str) -> Option<(&str, &str)> {
    let rest = text.strip_prefix(DELETE_PREFIX)?;
    rest.split_once(DELETE_ARROW)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(source: &str, target: &str) -> Word {
        Word {
            word_id: 1,
            source: source.to_string(),
            target: target.to_string(),
        }
    }

    #[test]
    fn test_delete_label_round_trip() {
        let label = delete_label(&word("Машина", "Car"));
        assert_eq!(label, "Delete: Машина → Car");
        assert_eq!(parse_delete_label(&label), Some(("Машина", "Car")));
    }

    #[test]
    fn test_parse_delete_label_rejects_other_text() {
        assert_eq!(parse_delete_label("Машина → Car"), None);
        assert_eq!(parse_delete_label("Delete: no arrow here"), None);
    }

    #[test]
    fn test_question_options_layout() {
        let options: Vec<String> = ["Car", "House", "Cat", "Dog"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let markup = question_options(&options);

        // Two rows of two options, then the Next row.
        assert_eq!(markup.keyboard.len(), 3);
        assert_eq!(markup.keyboard[0].len(), 2);
        assert_eq!(markup.keyboard[1].len(), 2);
        assert_eq!(markup.keyboard[2][0].text, BTN_NEXT);
    }

    #[test]
    fn test_question_options_with_odd_count() {
        let options: Vec<String> = ["Car", "House", "Cat"].iter().map(|s| s.to_string()).collect();
        let markup = question_options(&options);
        assert_eq!(markup.keyboard.len(), 3);
        assert_eq!(markup.keyboard[1].len(), 1);
    }

    #[test]
    fn test_delete_list_one_row_per_word() {
        let words = vec![word("Машина", "Car"), word("Дом", "House")];
        let markup = delete_list(&words);
        assert_eq!(markup.keyboard.len(), 2);
        assert_eq!(markup.keyboard[0][0].text, "Delete: Машина → Car");
    }
}
