//! Text formatting for replies.

use homestead_types::Item;

/// Group digits in thousands: `1234567` becomes `1,234,567`.
pub fn group_thousands(amount: u64) -> String {
    let digits = amount.to_string();
    let len = digits.len();
    let mut out = String::with_capacity(len.saturating_mul(2));
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && len.saturating_sub(i).is_multiple_of(3) {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `31,000 gold`.
pub fn gold(amount: u64) -> String {
    format!("{} gold", group_thousands(amount))
}

/// `7x eggs`, using the singular product name for exactly one.
pub fn item(item: &Item) -> String {
    format!(
        "{}x {}",
        group_thousands(item.amount),
        item.kind.product_name(item.amount)
    )
}

/// One bulleted line per item, or `empty` when there are none.
pub fn item_list(items: &[Item], empty: &str) -> String {
    if items.is_empty() {
        return empty.to_owned();
    }
    items
        .iter()
        .map(|i| format!("\u{2022} {}", item(i)))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use homestead_types::AnimalType;

    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(500), "500");
        assert_eq!(group_thousands(1_234), "1,234");
        assert_eq!(group_thousands(31_000), "31,000");
        assert_eq!(group_thousands(1_000_000), "1,000,000");
        assert_eq!(gold(147_000), "147,000 gold");
    }

    #[test]
    fn item_lines() {
        let items = [
            Item::new(AnimalType::Rooster, 1),
            Item::new(AnimalType::Rooster, 7),
        ];
        assert_eq!(item(&Item::new(AnimalType::Rooster, 1)), "1x egg");
        assert_eq!(item(&Item::new(AnimalType::Rooster, 7)), "7x eggs");
        assert_eq!(item_list(&[], "Nothing yet"), "Nothing yet");
        assert_eq!(item_list(&items, "").lines().count(), 2);
    }
}
