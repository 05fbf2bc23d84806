use std::collections::HashMap;

use super::similarity::match_ratio;

pub const DEFAULT_THRESHOLD: f64 = 0.6;

/// Canonical dish keys and their aliases, in a fixed enumeration order:
/// keys in insertion order, then each key's aliases in insertion order.
#[derive(Debug, Clone)]
pub struct FoodAliasTable {
    entries: Vec<(String, Vec<String>)>,
    /// normalized alias -> key; on a collision the later key wins
    inverse: HashMap<String, String>,
}

impl FoodAliasTable {
    pub fn new<K, A>(entries: Vec<(K, Vec<A>)>) -> Self
    where
        K: Into<String>,
        A: Into<String>,
    {
        let entries: Vec<(String, Vec<String>)> = entries
            .into_iter()
            .map(|(key, aliases)| (key.into(), aliases.into_iter().map(Into::into).collect()))
            .collect();

        let mut inverse = HashMap::new();
        for (key, aliases) in &entries {
            for alias in aliases {
                inverse.insert(normalize(alias), key.clone());
            }
        }

        Self { entries, inverse }
    }

    #[cfg(test)]
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    #[cfg(test)]
    pub fn aliases(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, aliases)| aliases.as_slice())
    }

    fn iter_aliases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .flat_map(|(key, aliases)| aliases.iter().map(move |alias| (key.as_str(), alias.as_str())))
    }

    fn key_for_alias(&self, normalized_alias: &str) -> Option<&str> {
        self.inverse.get(normalized_alias).map(String::as_str)
    }

    /// Aliases that can never resolve to their own key because an alias of an
    /// earlier key is contained in them. Returned as `(alias, owner, winner)`.
    pub fn shadowed_aliases(&self) -> Vec<(String, String, String)> {
        let mut shadowed = Vec::new();
        for (position, (key, aliases)) in self.entries.iter().enumerate() {
            for alias in aliases {
                let text = normalize(alias);
                let winner = self.entries[..position].iter().find(|(_, earlier)| {
                    earlier.iter().any(|candidate| {
                        let candidate = normalize(candidate);
                        !candidate.is_empty() && text.contains(&candidate)
                    })
                });
                if let Some((winner, _)) = winner {
                    shadowed.push((alias.clone(), key.clone(), winner.clone()));
                }
            }
        }
        shadowed
    }

    /// Indian dish vocabulary used for classifier labels and typed searches.
    pub fn indian_dishes() -> Self {
        Self::new(vec![
            // breakfast
            ("idli", vec!["idli", "steamed rice cake", "rice cake", "rice dumpling", "steamed cake", "south indian breakfast"]),
            ("dosa", vec!["dosa", "crepe", "pancake", "thin pancake", "rice pancake", "south indian crepe"]),
            ("upma", vec!["upma", "semolina porridge", "semolina dish", "savory porridge", "south indian breakfast"]),
            ("poha", vec!["poha", "flattened rice", "beaten rice", "rice flakes", "indian breakfast", "rice dish"]),
            ("dhokla", vec!["dhokla", "steamed cake", "fermented cake", "gram flour cake", "gujarati snack"]),
            // mains
            ("sambar", vec!["sambar", "lentil stew", "vegetable stew", "south indian stew", "dal stew", "soup"]),
            ("curry", vec!["curry", "gravy", "sauce", "stew", "masala", "spiced dish", "indian dish"]),
            ("rice", vec!["rice", "biryani", "pulao", "fried rice", "steamed rice", "boiled rice", "indian rice"]),
            ("dal", vec!["dal", "lentil", "lentil soup", "pulse", "legume", "bean soup", "indian dal"]),
            ("roti", vec!["roti", "chapati", "flatbread", "wheat bread", "indian bread", "whole wheat bread"]),
            ("naan", vec!["naan", "leavened bread", "tandoori bread", "indian flatbread", "bread"]),
            ("paneer", vec!["paneer", "cottage cheese", "cheese", "indian cheese", "fresh cheese", "dairy"]),
            ("biryani", vec!["biryani", "rice dish", "spiced rice", "indian rice dish", "mixed rice"]),
            ("pulao", vec!["pulao", "pilaf", "rice pilaf", "fried rice dish", "indian rice"]),
            ("paratha", vec!["paratha", "stuffed bread", "layered bread", "indian flatbread", "bread"]),
            ("puri", vec!["puri", "fried bread", "deep fried bread", "puffed bread", "indian bread"]),
            // snacks
            ("samosa", vec!["samosa", "stuffed pastry", "fried pastry", "indian snack", "savory pastry"]),
            ("pakora", vec!["pakora", "fritter", "bhajji", "fried snack", "vegetable fritter", "indian snack"]),
            ("vada", vec!["vada", "savory donut", "lentil fritter", "south indian snack", "fried snack"]),
            ("bhel puri", vec!["bhel puri", "puffed rice snack", "chaat", "indian street food", "snack"]),
            ("pav bhaji", vec!["pav bhaji", "bread and curry", "vegetable curry", "mumbai street food", "snack"]),
            // sweets
            ("kheer", vec!["kheer", "rice pudding", "milk pudding", "indian dessert", "sweet dish"]),
            ("gulab jamun", vec!["gulab jamun", "milk sweet", "syrup sweet", "indian sweet", "dessert"]),
            ("jalebi", vec!["jalebi", "sweet pretzel", "syrup sweet", "indian sweet", "dessert"]),
            ("rasgulla", vec!["rasgulla", "cheese ball", "milk sweet", "bengali sweet", "dessert"]),
            ("laddu", vec!["laddu", "sweet ball", "indian sweet", "round sweet", "dessert"]),
            ("barfi", vec!["barfi", "milk fudge", "indian sweet", "milk sweet", "dessert"]),
            // ingredients
            ("potato", vec!["potato", "aloo", "spud", "tuber", "vegetable"]),
            ("tomato", vec!["tomato", "tamatar", "red fruit", "vegetable"]),
            ("onion", vec!["onion", "pyaz", "bulb", "vegetable"]),
            ("garlic", vec!["garlic", "lehsun", "clove", "spice"]),
            ("ginger", vec!["ginger", "adrak", "root", "spice"]),
            ("chili", vec!["chili", "mirchi", "pepper", "spice"]),
            ("coriander", vec!["coriander", "dhania", "herb", "green"]),
            ("cumin", vec!["cumin", "jeera", "seed", "spice"]),
            ("turmeric", vec!["turmeric", "haldi", "spice", "yellow"]),
            ("ghee", vec!["ghee", "clarified butter", "fat", "oil"]),
        ])
    }
}

/// Lowercase and keep only ASCII letters, digits and whitespace.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect()
}

/// Maps free-text labels onto canonical dish keys.
#[derive(Debug, Clone)]
pub struct LabelResolver {
    table: FoodAliasTable,
}

impl LabelResolver {
    pub fn new(table: FoodAliasTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &FoodAliasTable {
        &self.table
    }

    /// Resolve `text` to a canonical key: alias containment first, then the
    /// best fuzzy ratio if it reaches `threshold`.
    pub fn resolve(&self, text: &str, threshold: f64) -> Option<String> {
        let cleaned = normalize(text);
        if cleaned.trim().is_empty() {
            return None;
        }

        if let Some(key) = self.resolve_by_containment(&cleaned) {
            log::debug!("🔎 '{}' contains an alias of '{}'", cleaned, key);
            return Some(key.to_string());
        }

        let (alias, score) = self.best_fuzzy_alias(&cleaned)?;
        if score < threshold {
            log::debug!("🔎 '{}' best fuzzy alias '{}' scored {:.3} (< {:.2})", cleaned, alias, score, threshold);
            return None;
        }

        let key = self.table.key_for_alias(&alias)?;
        log::debug!("🔎 '{}' fuzzy-matched alias '{}' ({:.3}) -> '{}'", cleaned, alias, score, key);
        Some(key.to_string())
    }

    fn resolve_by_containment(&self, cleaned: &str) -> Option<&str> {
        self.table
            .iter_aliases()
            .find(|(_, alias)| {
                let alias = normalize(alias);
                !alias.is_empty() && cleaned.contains(&alias)
            })
            .map(|(key, _)| key)
    }

    /// Highest-scoring normalized alias. Ties keep the first seen.
    fn best_fuzzy_alias(&self, cleaned: &str) -> Option<(String, f64)> {
        let mut best: Option<(String, f64)> = None;
        for (_, alias) in self.table.iter_aliases() {
            let alias = normalize(alias);
            let score = match_ratio(cleaned, &alias);
            let better = match &best {
                Some((_, best_score)) => score > *best_score,
                None => true,
            };
            if better {
                best = Some((alias, score));
            }
        }
        best
    }
}

impl Default for LabelResolver {
    fn default() -> Self {
        Self::new(FoodAliasTable::indian_dishes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("Rice cake, Idli-style!"), "rice cake idlistyle");
        assert_eq!(normalize("  Pav Bhaji (Mumbai) "), "  pav bhaji mumbai ");
        assert_eq!(normalize("...!!"), "");
    }

    #[test]
    fn test_containment_match() {
        let resolver = LabelResolver::default();
        assert_eq!(resolver.resolve("rice cake, idli style", DEFAULT_THRESHOLD).as_deref(), Some("idli"));
    }

    #[test]
    fn test_fuzzy_match_misspelling() {
        let resolver = LabelResolver::default();
        assert_eq!(resolver.resolve("chappati", DEFAULT_THRESHOLD).as_deref(), Some("roti"));
    }

    #[test]
    fn test_unresolved_inputs() {
        let resolver = LabelResolver::default();
        assert_eq!(resolver.resolve("", DEFAULT_THRESHOLD), None);
        assert_eq!(resolver.resolve("?!.,", DEFAULT_THRESHOLD), None);
        assert_eq!(resolver.resolve("   ", DEFAULT_THRESHOLD), None);
        assert_eq!(resolver.resolve("zzzzzzzz qqqq", DEFAULT_THRESHOLD), None);
    }

    #[test]
    fn test_containment_follows_table_order() {
        let table = FoodAliasTable::new(vec![
            ("first", vec!["cake"]),
            ("second", vec!["rice cake"]),
        ]);
        let resolver = LabelResolver::new(table);

        assert_eq!(resolver.resolve("rice cake", 0.6).as_deref(), Some("first"));
    }

    #[test]
    fn test_inverse_index_last_write_wins() {
        let table = FoodAliasTable::new(vec![
            ("first", vec!["alpha", "shared"]),
            ("second", vec!["beta", "shared"]),
        ]);

        assert_eq!(table.key_for_alias("shared"), Some("second"));
        assert_eq!(table.key_for_alias("alpha"), Some("first"));
    }

    #[test]
    fn test_every_unshadowed_alias_resolves_to_its_key() {
        let table = FoodAliasTable::indian_dishes();
        let shadowed: Vec<(String, String)> = table
            .shadowed_aliases()
            .into_iter()
            .map(|(alias, owner, _)| (alias, owner))
            .collect();
        let resolver = LabelResolver::new(table.clone());

        for key in table.keys() {
            for alias in table.aliases(key).unwrap() {
                if shadowed.contains(&(alias.clone(), key.to_string())) {
                    continue;
                }
                assert_eq!(resolver.resolve(alias, DEFAULT_THRESHOLD).as_deref(), Some(key), "alias {}", alias);
            }
        }
    }

    #[test]
    fn test_shadowed_aliases_are_reported() {
        let table = FoodAliasTable::indian_dishes();
        let shadowed = table.shadowed_aliases();

        // "spiced rice" belongs to biryani but contains the earlier "rice" alias
        assert!(shadowed
            .iter()
            .any(|(alias, owner, winner)| alias == "spiced rice" && owner == "biryani" && winner == "rice"));
        assert!(!shadowed.iter().any(|(alias, _, _)| alias == "idli"));
    }

    #[test]
    fn test_raising_threshold_is_monotonic() {
        let resolver = LabelResolver::default();
        let queries = ["chappati", "sambhar", "gulab jamoon", "rice cake idli style", "pizza", "laddoo"];
        let thresholds = [0.0, 0.3, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0];

        for query in queries {
            let mut previous: Option<Option<String>> = None;
            for threshold in thresholds {
                let current = resolver.resolve(query, threshold);
                if let Some(prev) = &previous {
                    if prev.is_none() {
                        assert!(current.is_none(), "{} resolved again at {}", query, threshold);
                    } else if current.is_some() {
                        assert_eq!(&current, prev, "{} changed key at {}", query, threshold);
                    }
                }
                previous = Some(current);
            }
        }

        // containment ignores the threshold entirely
        assert_eq!(resolver.resolve("rice cake idli style", 1.0).as_deref(), Some("idli"));
    }
}
