//! Starter deck written for every new account at registration.

use time::OffsetDateTime;
use uuid::Uuid;

use crate::services::deck::{AccountDocument, Card, Category};

/// Category name followed by its six (German word, translation) pairs.
type Template = (&'static str, [(&'static str, &'static str); 6]);

const STARTER_DECK: [Template; 4] = [
    (
        "Food | Еда | Ас",
        [("Brot", "Нан"), ("Apfel", "Алма"), ("Wasser", "Су"), ("Käse", "Ірімшік"), ("Milch", "Сүт"), ("Suppe", "Сорпа")],
    ),
    (
        "Furniture | Мебель | Жиһаз",
        [
            ("Stuhl", "Орындық"),
            ("Tisch", "Үстел"),
            ("Bett", "Төсек"),
            ("Schrank", "Шкаф"),
            ("Sofa", "Диван"),
            ("Lampe", "Шам"),
        ],
    ),
    (
        "Travel | Путешествия | Саяхат",
        [
            ("Bahnhof", "Вокзал"),
            ("Flughafen", "Әуежай"),
            ("Ticket", "Билет"),
            ("Karte", "Карта"),
            ("Hotel", "Қонақүй"),
            ("Bus", "Автобус"),
        ],
    ),
    (
        "Animals | Животные | Жануарлар",
        [("Hund", "Ит"), ("Katze", "Мысық"), ("Vogel", "Құс"), ("Pferd", "Жылқы"), ("Fisch", "Балық"), ("Schaf", "Қой")],
    ),
];

/// Build the starter document. Every category and card gets a fresh id.
#[must_use]
pub fn seeded_document(now: OffsetDateTime) -> AccountDocument {
    let mut doc = AccountDocument::default();
    for (name, pairs) in STARTER_DECK {
        let category = Category { id: Uuid::new_v4(), name: name.to_owned(), created_at: now };
        doc.cards.extend(pairs.iter().map(|(word, translation)| Card {
            id: Uuid::new_v4(),
            category_id: category.id,
            word: (*word).to_owned(),
            translation: (*translation).to_owned(),
            created_at: now,
        }));
        doc.categories.push(category);
    }
    doc
}

#[cfg(test)]
#[path = "seed_test.rs"]
mod tests;
