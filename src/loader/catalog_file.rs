//! Card catalog file parser (.txt key:value records)
//!
//! One record per card, fields as `Key:Value` lines, records separated
//! by the next `Name:` line. Blank lines and `#` comments are skipped.

use crate::core::catalog::{CardData, Catalog, EntersTapped};
use crate::core::mana::{Color, Mana};
use crate::core::CardType;
use crate::{GoldfishError, Result};
use smallvec::SmallVec;

/// Parse a whole catalog file into a `Catalog`.
pub fn parse(content: &str) -> Result<Catalog> {
    let mut entries: Vec<CardData> = Vec::new();
    let mut current: Option<CardData> = None;

    for (number, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            return Err(GoldfishError::InvalidCardFormat(format!(
                "line {}: expected Key:Value, got {:?}",
                number + 1,
                raw
            )));
        };
        let (key, value) = (key.trim(), value.trim());

        if key == "Name" {
            if let Some(done) = current.take() {
                entries.push(validated(done)?);
            }
            current = Some(CardData::new(value));
            continue;
        }

        let Some(card) = current.as_mut() else {
            return Err(GoldfishError::InvalidCardFormat(format!(
                "line {}: {} before any Name:",
                number + 1,
                key
            )));
        };

        match key {
            "Types" => {
                for part in value.split_whitespace() {
                    match part {
                        "Basic" => card.types.push(CardType::Basic),
                        "Land" => card.types.push(CardType::Land),
                        "Creature" => card.types.push(CardType::Creature),
                        "Artifact" => card.types.push(CardType::Artifact),
                        "Enchantment" => card.types.push(CardType::Enchantment),
                        "Instant" => card.types.push(CardType::Instant),
                        "Sorcery" => card.types.push(CardType::Sorcery),
                        // Subtypes (Forest, Giant, ...) carry no rules weight here
                        _ => {}
                    }
                }
            }
            "Colors" => {
                for part in value.split(',') {
                    match part.trim() {
                        "W" => card.colors.push(Color::White),
                        "U" => card.colors.push(Color::Blue),
                        "B" => card.colors.push(Color::Black),
                        "R" => card.colors.push(Color::Red),
                        "G" => card.colors.push(Color::Green),
                        other => {
                            return Err(GoldfishError::InvalidCardFormat(format!(
                                "{}: unknown color {:?}",
                                card.name, other
                            )))
                        }
                    }
                }
            }
            "Cost" => card.cost = Some(Mana::parse(value)?),
            "TapsFor" => {
                let mut options: SmallVec<[Mana; 2]> = SmallVec::new();
                for part in value.split(',') {
                    options.push(Mana::parse(part.trim())?);
                }
                card.taps_for = Some(options);
            }
            "EntersTapped" => {
                card.enters_tapped = match value {
                    "true" => EntersTapped::Yes,
                    "false" => EntersTapped::No,
                    "check" => EntersTapped::Check,
                    other => {
                        return Err(GoldfishError::InvalidCardFormat(format!(
                            "{}: EntersTapped must be true/false/check, got {:?}",
                            card.name, other
                        )))
                    }
                };
            }
            "CycleCost" => card.cycle_cost = Some(Mana::parse(value)?),
            "CycleVerb" => card.cycle_verb = Some(value.to_string()),
            "SacrificeCost" => card.sacrifice_cost = Some(Mana::parse(value)?),
            // Ignore fields this engine has no use for
            _ => {}
        }
    }

    if let Some(done) = current.take() {
        entries.push(validated(done)?);
    }

    if entries.is_empty() {
        return Err(GoldfishError::InvalidCardFormat(
            "empty card catalog".to_string(),
        ));
    }

    Ok(Catalog::from_entries(entries))
}

fn validated(card: CardData) -> Result<CardData> {
    if card.types.is_empty() {
        return Err(GoldfishError::InvalidCardFormat(format!(
            "{}: missing Types",
            card.name
        )));
    }
    Ok(card)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_records() {
        let catalog = parse(
            "# two cards\n\
             Name:Forest\n\
             Types:Basic Land Forest\n\
             TapsFor:G\n\
             \n\
             Name:Primeval Titan\n\
             Types:Creature Giant\n\
             Colors:G\n\
             Cost:2GG\n",
        )
        .unwrap();
        assert_eq!(catalog.len(), 2);

        let forest = catalog.lookup("Forest").unwrap();
        let entry = catalog.entry(forest);
        assert_eq!(entry.taps_for.as_ref().unwrap().len(), 1);
        assert_eq!(entry.enters_tapped, EntersTapped::No);
        assert!(entry.cost.is_none());
    }

    #[test]
    fn test_missing_types_is_fatal() {
        assert!(parse("Name:Mystery Card\nCost:1\n").is_err());
    }

    #[test]
    fn test_field_before_name_is_fatal() {
        assert!(parse("Cost:1\nName:Oops\nTypes:Artifact\n").is_err());
    }

    #[test]
    fn test_bad_mana_is_fatal() {
        assert!(parse("Name:Broken\nTypes:Artifact\nCost:1X\n").is_err());
    }
}
