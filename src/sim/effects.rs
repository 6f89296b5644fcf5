//! Per-card effect handlers
//!
//! Each card's semantics live in one handler, dispatched on the card's
//! slug. Handlers are pure: they take a state (already charged for the
//! card) and return every state the effect can resolve to, composing
//! only the primitives on `GameState`.
//!
//! A land with no play handler simply enters, so new lands work before
//! they get special handling. A castable card with no cast handler is a
//! fatal error: its cost would be paid and nothing would happen, which
//! corrupts results silently.

use crate::core::{best_options, names, Card, Cards, Mana};
use crate::sim::state::{combinations, GameState, PACT_DEBT};
use crate::{GoldfishError, Result};

/// Consult the per-card predicate behind the `check` entry sentinel.
pub(crate) fn enters_tapped_check(state: &GameState, card: Card) -> bool {
    match card.slug() {
        // arrives ready once a Forest is already down
        "castle_garenbrig" => !state.battlefield().contains_named(names::FOREST),
        _ => false,
    }
}

/// The land is on the battlefield; resolve its entry effect.
pub(crate) fn dispatch_play(state: GameState, card: Card) -> Vec<GameState> {
    match card.slug() {
        "boros_garrison" | "selesnya_sanctuary" | "simic_growth_chamber" => state.bounce_land(),
        "lotus_field" => play_lotus_field(state),
        "wooded_foothills" => play_wooded_foothills(state, card),
        _ => vec![state],
    }
}

/// The spell is paid for and off the hand; resolve it.
pub(crate) fn dispatch_cast(state: GameState, card: Card) -> Result<Vec<GameState>> {
    Ok(match card.slug() {
        "amulet_of_vigor" => cast_permanent(state, card),
        "ancient_stirrings" => cast_ancient_stirrings(state),
        "arboreal_grazer" => cast_arboreal_grazer(state, card),
        "azusa_lost_but_seeking" => cast_azusa_lost_but_seeking(state, card),
        "bond_of_flourishing" => cast_bond_of_flourishing(state),
        "elvish_rejuvenator" => cast_elvish_rejuvenator(state, card),
        "explore" | "growth_spiral" => cast_draw_extra_land(state),
        "manamorphose" => cast_manamorphose(state),
        "oath_of_nissa" => cast_oath_of_nissa(state),
        "once_upon_a_time" => cast_once_upon_a_time(state),
        "opt" => cast_opt(state),
        "primeval_titan" => cast_primeval_titan(state),
        "sakura_tribe_elder" => cast_sakura_tribe_elder(state, card),
        "sakura_tribe_scout" => cast_permanent(state, card),
        "search_for_tomorrow" => cast_search_for_tomorrow(state),
        "simian_spirit_guide" => cast_permanent(state, card),
        "summoners_pact" => cast_summoners_pact(state),
        "through_the_breach" => cast_through_the_breach(state)?,
        "trinket_mage" => cast_trinket_mage(state),
        _ => return Err(GoldfishError::UnhandledCard(card.name().to_string())),
    })
}

/// The cycling cost is paid and the card is gone from hand.
pub(crate) fn dispatch_cycle(state: GameState, card: Card) -> Vec<GameState> {
    match card.slug() {
        "sheltered_thicket" => cycle_draw(state),
        "search_for_tomorrow" => cycle_suspend(state, card, 2),
        "simian_spirit_guide" => exile_for_mana(
            state,
            Mana {
                red: 1,
                total: 1,
                ..Mana::ZERO
            },
        ),
        "tolaria_west" => transmute_for_zeros(state),
        _ => vec![state],
    }
}

/// The permanent left the battlefield and its cost is paid.
pub(crate) fn dispatch_sacrifice(state: GameState, card: Card) -> Vec<GameState> {
    match card.slug() {
        "crystal_vein" => sacrifice_for_mana(
            state,
            Mana {
                total: 2,
                ..Mana::ZERO
            },
        ),
        _ => vec![state],
    }
}

// --- lands -----------------------------------------------------------

/// Entry tax: the field keeps only itself unless two other lands go.
/// Every distinct pair (the field included) is a separate future.
fn play_lotus_field(state: GameState) -> Vec<GameState> {
    let lands: Cards = state.battlefield().iter().filter(|c| c.is_land()).collect();
    let pairs = combinations(&lands, 2);
    if pairs.is_empty() {
        let mut next = state;
        for card in lands.iter() {
            next.battlefield_remove(card);
        }
        next.annotate("lose every land");
        return vec![next];
    }
    pairs
        .into_iter()
        .map(|pair| {
            let mut next = state.clone();
            for card in &pair {
                next.battlefield_remove(*card);
            }
            next.annotate(&format!("lose {} and {}", pair[0].show(), pair[1].show()));
            next
        })
        .collect()
}

/// Crack immediately for the basic this deck actually wants.
fn play_wooded_foothills(mut state: GameState, card: Card) -> Vec<GameState> {
    state.battlefield_remove(card);
    let Ok(forest) = Card::named(names::FOREST) else {
        return vec![state];
    };
    if !state.library_has(forest) {
        state.annotate("whiff");
        return vec![state];
    }
    state.annotate(&format!("fetch {}", forest.show()));
    state.fetch(forest, false)
}

// --- spells ----------------------------------------------------------

/// Permanents with no entry effect just land on the battlefield.
fn cast_permanent(mut state: GameState, card: Card) -> Vec<GameState> {
    state.battlefield_add(card);
    vec![state]
}

/// Reveal five, take a colorless card; the rest go away.
fn cast_ancient_stirrings(mut state: GameState) -> Vec<GameState> {
    let revealed: Cards = state.top(5).iter().copied().collect();
    state.mill(5);
    take_one_of(state, best_options(revealed.colorless()))
}

/// Put a land from hand onto the battlefield tapped.
fn cast_arboreal_grazer(state: GameState, _card: Card) -> Vec<GameState> {
    let lands = state.hand().lands();
    if lands.is_empty() {
        let mut next = state;
        next.annotate("whiff");
        return vec![next];
    }
    let mut out = Vec::new();
    for land in lands {
        let mut next = state.clone();
        next.annotate(&format!("play {}", land.show()));
        out.extend(next.play_tapped(land));
    }
    out
}

/// Legendary: a second copy stays in hand doing nothing.
fn cast_azusa_lost_but_seeking(mut state: GameState, card: Card) -> Vec<GameState> {
    if !state.battlefield().contains(card) {
        state.add_land_drops(2);
        state.battlefield_add(card);
    }
    vec![state]
}

/// Reveal three, take a permanent.
fn cast_bond_of_flourishing(mut state: GameState) -> Vec<GameState> {
    let revealed: Cards = state.top(3).iter().copied().collect();
    state.mill(3);
    take_one_of(state, best_options(revealed.permanents()))
}

/// Reveal five; a revealed land goes straight into play tapped.
fn cast_elvish_rejuvenator(mut state: GameState, _card: Card) -> Vec<GameState> {
    let revealed: Cards = state.top(5).iter().copied().collect();
    state.mill(5);
    let picks = best_options(revealed.lands());
    if picks.is_empty() {
        state.annotate("whiff");
        return vec![state];
    }
    let mut out = Vec::new();
    for land in picks {
        let mut next = state.clone();
        next.annotate(&format!("take {}", land.show()));
        out.extend(next.fetch(land, true));
    }
    out
}

/// Draw a card and add a land drop this turn.
fn cast_draw_extra_land(mut state: GameState) -> Vec<GameState> {
    if !state.draw_one_noted() {
        return Vec::new();
    }
    state.add_land_drops(1);
    vec![state]
}

/// Two mana in any useful colors, then a draw. The color pairs are
/// tuned to this deck's costs.
fn cast_manamorphose(state: GameState) -> Vec<GameState> {
    let mut out = Vec::new();
    for expr in ["UU", "UG", "GG"] {
        let Ok(mana) = Mana::parse(expr) else {
            continue;
        };
        let mut next = state.clone();
        next.add_mana(mana);
        next.annotate_pool();
        if next.draw_one_noted() {
            out.push(next);
        }
    }
    out
}

/// Reveal three, take a creature or land.
fn cast_oath_of_nissa(mut state: GameState) -> Vec<GameState> {
    let revealed: Cards = state.top(3).iter().copied().collect();
    state.mill(3);
    take_one_of(state, best_options(revealed.creatures_lands()))
}

/// Reveal five, take a creature or land.
fn cast_once_upon_a_time(mut state: GameState) -> Vec<GameState> {
    let revealed: Cards = state.top(5).iter().copied().collect();
    state.mill(5);
    take_one_of(state, best_options(revealed.creatures_lands()))
}

/// Scry one, then draw.
fn cast_opt(state: GameState) -> Vec<GameState> {
    let mut out = Vec::new();
    for mut next in state.scry1() {
        if next.draw_one_noted() {
            out.push(next);
        }
    }
    out
}

/// The goal. The driver short-circuits as soon as it sees this flag.
fn cast_primeval_titan(mut state: GameState) -> Vec<GameState> {
    state.mark_done();
    vec![state]
}

/// Chump body aside, it fetches a basic into play tapped.
fn cast_sakura_tribe_elder(state: GameState, _card: Card) -> Vec<GameState> {
    let remaining: Cards = state.library().iter().copied().collect();
    let mut out = Vec::new();
    for basic in remaining.basic_lands() {
        let mut next = state.clone();
        next.annotate(&format!("grab {}", basic.show()));
        out.extend(next.fetch(basic, true));
    }
    out
}

/// Hard cast: a basic arrives untapped right now.
fn cast_search_for_tomorrow(state: GameState) -> Vec<GameState> {
    let remaining: Cards = state.library().iter().copied().collect();
    let mut out = Vec::new();
    for basic in remaining.basic_lands() {
        let mut next = state.clone();
        next.annotate(&format!("grab {}", basic.show()));
        out.extend(next.fetch(basic, false));
    }
    out
}

/// Grab any green creature from the deck now, owe 2GG at the next
/// upkeep. Copies already in hand or already down add nothing.
fn cast_summoners_pact(state: GameState) -> Vec<GameState> {
    let remaining: Cards = state.library().iter().copied().collect();
    let mut out = Vec::new();
    for creature in remaining.green_creatures() {
        if state.hand().contains(creature) || state.battlefield().contains(creature) {
            continue;
        }
        let mut next = state.clone();
        next.annotate(&format!("get {}", creature.show()));
        next.hand_add(creature);
        next.add_debt(PACT_DEBT);
        out.push(next);
    }
    out
}

/// The goal, off one red spell. Haste wins report as fast; the summary
/// reads that off the battlefield.
fn cast_through_the_breach(mut state: GameState) -> Result<Vec<GameState>> {
    let titan = Card::named(names::PRIMEVAL_TITAN)?;
    if !state.hand().contains(titan) {
        return Ok(Vec::new());
    }
    let amulet = Card::named(names::AMULET_OF_VIGOR)?;
    state.annotate(&format!("put {} onto the battlefield", titan.show()));
    state.battlefield_add(amulet);
    state.mark_done();
    Ok(vec![state])
}

/// Tutor a cheap artifact to hand.
fn cast_trinket_mage(state: GameState) -> Vec<GameState> {
    let remaining: Cards = state.library().iter().copied().collect();
    let mut out = Vec::new();
    for trinket in remaining.trinkets() {
        let mut next = state.clone();
        next.annotate(&format!("grab {}", trinket.show()));
        next.hand_add(trinket);
        out.push(next);
    }
    out
}

// --- cycling and sacrifice -------------------------------------------

fn cycle_draw(mut state: GameState) -> Vec<GameState> {
    if state.draw_one_noted() {
        vec![state]
    } else {
        Vec::new()
    }
}

fn cycle_suspend(mut state: GameState, card: Card, ticks: u8) -> Vec<GameState> {
    state.suspend_push(card, ticks);
    vec![state]
}

fn exile_for_mana(mut state: GameState, mana: Mana) -> Vec<GameState> {
    state.add_mana(mana);
    state.annotate_pool();
    vec![state]
}

/// Swap for anything with converted cost zero, lands included.
fn transmute_for_zeros(state: GameState) -> Vec<GameState> {
    let remaining: Cards = state.library().iter().copied().collect();
    let mut out = Vec::new();
    for zero in best_options(remaining.zeros()) {
        let mut next = state.clone();
        next.annotate(&format!("grab {}", zero.show()));
        next.hand_add(zero);
        out.push(next);
    }
    out
}

fn sacrifice_for_mana(mut state: GameState, mana: Mana) -> Vec<GameState> {
    state.add_mana(mana);
    state.annotate_pool();
    vec![state]
}

// --- shared ----------------------------------------------------------

/// One successor per candidate card taken into hand; a whiff keeps the
/// single milled state alive.
fn take_one_of(state: GameState, picks: Vec<Card>) -> Vec<GameState> {
    if picks.is_empty() {
        let mut next = state;
        next.annotate("whiff");
        return vec![next];
    }
    picks
        .into_iter()
        .map(|card| {
            let mut next = state.clone();
            next.annotate(&format!("take {}", card.show()));
            next.hand_add(card);
            next
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GameState;
    use std::sync::Arc;

    fn card(name: &str) -> Card {
        Card::named(name).unwrap()
    }

    fn stacked(deck: &[&str]) -> Arc<[Card]> {
        deck.iter().map(|n| card(n)).collect()
    }

    /// Hand is the first seven of the deck; cursor sits after them.
    fn opening(deck: &[&str]) -> GameState {
        GameState::new(stacked(deck), true)
    }

    #[test]
    fn test_reveal_takes_best_colorless() {
        // Hand: seven Forests. Top five: Forest Forest Amulet Titan Island.
        let state = opening(&[
            "Forest", "Forest", "Forest", "Forest", "Forest", "Forest", "Forest",
            "Forest", "Forest", "Amulet of Vigor", "Primeval Titan", "Island",
            "Forest", "Forest",
        ]);
        let out = cast_ancient_stirrings(state);
        // The island is strictly worse than a Forest here; the titan is
        // green. Two picks: a Forest or the amulet.
        assert_eq!(out.len(), 2);
        let takes: Vec<bool> = out
            .iter()
            .map(|s| s.hand().contains(card("Amulet of Vigor")))
            .collect();
        assert!(takes.contains(&true));
        for next in &out {
            // All five revealed cards went away.
            assert_eq!(next.library().len(), 2);
        }
    }

    #[test]
    fn test_reveal_whiff_keeps_one_state() {
        // Top five cards are all green creatures: nothing colorless.
        let state = opening(&[
            "Forest", "Forest", "Forest", "Forest", "Forest", "Forest", "Forest",
            "Primeval Titan", "Primeval Titan", "Primeval Titan", "Arboreal Grazer",
            "Arboreal Grazer",
        ]);
        let out = cast_ancient_stirrings(state);
        assert_eq!(out.len(), 1);
        assert!(out[0].transcript().contains("whiff"));
    }

    #[test]
    fn test_grazer_plays_land_tapped() {
        let state = opening(&[
            "Forest", "Khalni Garden", "Primeval Titan", "Forest", "Forest", "Forest",
            "Forest", "Forest",
        ]);
        let out = cast_arboreal_grazer(state, card("Arboreal Grazer"));
        // One branch per distinct land in hand: Forest or Khalni Garden.
        assert_eq!(out.len(), 2);
        for next in &out {
            assert_eq!(next.battlefield().lands().len(), 1);
            // No mana: the land came in tapped with nothing to untap it.
            assert!(next.mana_pool().is_empty());
        }
    }

    #[test]
    fn test_legend_does_not_stack() {
        let state = opening(&[
            "Azusa, Lost but Seeking", "Forest", "Forest", "Forest", "Forest", "Forest",
            "Forest", "Forest",
        ]);
        let first = cast_azusa_lost_but_seeking(state, card("Azusa, Lost but Seeking"));
        assert_eq!(first[0].land_drops(), 2);
        let second =
            cast_azusa_lost_but_seeking(first[0].clone(), card("Azusa, Lost but Seeking"));
        assert_eq!(second[0].land_drops(), 2);
        assert_eq!(second[0].battlefield().count(card("Azusa, Lost but Seeking")), 1);
    }

    #[test]
    fn test_pact_grabs_target_and_owes() {
        let state = opening(&[
            "Forest", "Forest", "Forest", "Forest", "Forest", "Forest", "Forest",
            "Primeval Titan", "Forest", "Arboreal Grazer",
        ]);
        let out = cast_summoners_pact(state);
        // Titan and grazer are the green creatures left in the library.
        assert_eq!(out.len(), 2);
        for next in &out {
            assert_eq!(next.mana_debt(), PACT_DEBT);
        }
    }

    #[test]
    fn test_pact_skips_copies_in_hand_or_play() {
        let state = opening(&[
            "Primeval Titan", "Forest", "Forest", "Forest", "Forest", "Forest", "Forest",
            "Primeval Titan", "Primeval Titan",
        ]);
        // The titan is already in hand; the only library targets are
        // more titans, so the pact has nothing worth getting.
        assert!(cast_summoners_pact(state).is_empty());
    }

    #[test]
    fn test_breach_needs_the_goal_in_hand() {
        let empty_handed = opening(&[
            "Forest", "Forest", "Forest", "Forest", "Forest", "Forest", "Forest",
        ]);
        assert!(cast_through_the_breach(empty_handed).unwrap().is_empty());

        let ready = opening(&[
            "Primeval Titan", "Forest", "Forest", "Forest", "Forest", "Forest", "Forest",
        ]);
        let out = cast_through_the_breach(ready).unwrap();
        assert_eq!(out.len(), 1);
        assert!(out[0].done());
        assert!(out[0].fast());
    }

    #[test]
    fn test_transmute_fetches_zero_cost() {
        let state = opening(&[
            "Forest", "Forest", "Forest", "Forest", "Forest", "Forest", "Forest",
            "Summoner's Pact", "Primeval Titan", "Khalni Garden",
        ]);
        let out = transmute_for_zeros(state);
        // Pact, Khalni Garden and Forest all cost zero; the titan does not.
        assert_eq!(out.len(), 3);
        for next in &out {
            assert!(!next.hand().contains(card("Primeval Titan")));
        }
    }

    #[test]
    fn test_unknown_cast_handler_is_fatal() {
        // No cast handler exists for a plain land; reaching the
        // dispatcher with one must not silently resolve.
        let state = opening(&[
            "Forest", "Forest", "Forest", "Forest", "Forest", "Forest", "Forest",
        ]);
        let result = dispatch_cast(state, card("Island"));
        assert!(matches!(result, Err(GoldfishError::UnhandledCard(_))));
    }

    #[test]
    fn test_unknown_play_handler_is_noop() {
        let state = opening(&[
            "Forest", "Forest", "Forest", "Forest", "Forest", "Forest", "Forest",
        ]);
        let out = dispatch_play(state, card("Radiant Fountain"));
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_field_entry_enumerates_pairs() {
        let mut state = opening(&[
            "Forest", "Forest", "Forest", "Forest", "Forest", "Forest", "Forest",
        ]);
        state.battlefield_add(card("Forest"));
        state.battlefield_add(card("Island"));
        state.battlefield_add(card("Lotus Field"));
        let out = play_lotus_field(state);
        // Pairs over {Forest, Island, LotusField}: three distinct pairs.
        assert_eq!(out.len(), 3);
        for next in &out {
            assert_eq!(next.battlefield().lands().len(), 1);
        }
    }

    #[test]
    fn test_fetch_land_cracks_for_forest() {
        let mut state = opening(&[
            "Forest", "Forest", "Forest", "Forest", "Forest", "Forest", "Forest",
            "Forest",
        ]);
        state.battlefield_add(card("Wooded Foothills"));
        let out = play_wooded_foothills(state, card("Wooded Foothills"));
        assert_eq!(out.len(), 1);
        assert!(!out[0].battlefield().contains(card("Wooded Foothills")));
        assert!(out[0].battlefield().contains(card("Forest")));
        assert_eq!(out[0].mana_pool(), Mana::parse("G").unwrap());
    }

    #[test]
    fn test_crystal_vein_sacrifices_for_two() {
        let state = opening(&[
            "Forest", "Forest", "Forest", "Forest", "Forest", "Forest", "Forest",
        ]);
        let out = dispatch_sacrifice(state, card("Crystal Vein"));
        assert_eq!(out[0].mana_pool(), Mana::parse("2").unwrap());
    }
}
