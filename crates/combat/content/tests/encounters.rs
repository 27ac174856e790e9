//! Full-encounter scenarios driving the engine through the public API.

use combat_core::{
    CombatConfig, Combatant, CombatantId, Decision, EffectKind, Encounter, InitiativeOrder, Party,
    PartyId, Step, TurnSnapshot,
};
use combat_content::{Fighter, Satchel, SimpleTactic, shortsword, stunning_mace};

fn fixed(ids: &[u32]) -> CombatConfig {
    CombatConfig::with_initiative(InitiativeOrder::Fixed(
        ids.iter().copied().map(CombatantId).collect(),
    ))
}

fn party(fighters: Vec<Fighter>) -> Party {
    Party::new(
        fighters
            .into_iter()
            .map(|f| Box::new(f) as Box<dyn Combatant>)
            .collect(),
    )
    .unwrap()
}

fn turn(step: Step) -> TurnSnapshot {
    match step {
        Step::Turn(snapshot) => snapshot,
        Step::Finished(result) => panic!("finished early: {result:?}"),
    }
}

fn act(snapshot: &TurnSnapshot, action: &str, target: CombatantId) -> Decision {
    let action = snapshot
        .offered_action(action)
        .unwrap_or_else(|| panic!("'{action}' not offered: {snapshot:?}"))
        .clone();
    Decision::act_on(action, target)
}

fn pass(snapshot: &TurnSnapshot) -> Decision {
    Decision::act(snapshot.offered_action("pass").unwrap().clone())
}

fn armed(id: u32, name: &str, hp: u32) -> Fighter {
    Fighter::new(id, name, hp, 0).equip(shortsword())
}

#[test]
fn autonomous_skirmish_runs_to_exactly_one_result() {
    let first = party(vec![armed(0, "Aldric", 20).with_tactic(Box::new(SimpleTactic))]);
    let second = party(vec![armed(1, "Bandit", 20).with_tactic(Box::new(SimpleTactic))]);
    let mut encounter = Encounter::new(first, second, CombatConfig::seeded(11)).unwrap();

    let result = match encounter.start().unwrap() {
        Step::Finished(result) => result,
        Step::Turn(snapshot) => panic!("unexpected suspension: {snapshot:?}"),
    };
    assert_eq!(encounter.result(), Some(result));

    // the loser is at zero, the winner above it
    let (first, second) = encounter.into_parties();
    let sum = |members: &[Box<dyn Combatant>]| -> u32 {
        members.iter().map(|c| c.hit_points().current).sum()
    };
    match result.winner {
        PartyId::First => {
            assert!(sum(&first) > 0);
            assert_eq!(sum(&second), 0);
        }
        PartyId::Second => {
            assert_eq!(sum(&first), 0);
            assert!(sum(&second) > 0);
        }
    }
}

#[test]
fn external_hero_strikes_down_the_bandit() {
    let first = party(vec![armed(0, "Aldric", 30)]);
    let second = party(vec![armed(1, "Bandit", 12).with_tactic(Box::new(SimpleTactic))]);
    let mut encounter = Encounter::new(first, second, fixed(&[0, 1])).unwrap();

    let snapshot = turn(encounter.start().unwrap());
    assert_eq!(snapshot.active.id, CombatantId(0));

    // strike, take the bandit's answer, strike again
    let snapshot = turn(
        encounter
            .resume(act(&snapshot, "strike:shortsword", CombatantId(1)))
            .unwrap(),
    );
    assert_eq!(snapshot.enemies[0].hit_points.current, 6);
    assert_eq!(snapshot.active.hit_points.current, 24);

    match encounter
        .resume(act(&snapshot, "strike:shortsword", CombatantId(1)))
        .unwrap()
    {
        Step::Finished(result) => assert_eq!(result.winner, PartyId::First),
        Step::Turn(snapshot) => panic!("unexpected suspension: {snapshot:?}"),
    }
}

#[test]
fn poisoned_cuts_fester_across_rounds() {
    let hero = Fighter::new(0, "Aldric", 30, 0).equip(combat_content::poisoned_blade());
    let first = party(vec![hero]);
    let second = party(vec![armed(1, "Bandit", 9).with_tactic(Box::new(SimpleTactic))]);
    let mut encounter = Encounter::new(first, second, fixed(&[0, 1])).unwrap();

    let snapshot = turn(encounter.start().unwrap());
    let snapshot = turn(
        encounter
            .resume(act(&snapshot, "strike:poisoned_blade", CombatantId(1)))
            .unwrap(),
    );

    // 4 from the cut, 2 from the first round-boundary tick
    assert_eq!(snapshot.enemies[0].hit_points.current, 3);
    let poison = snapshot.effects_on(CombatantId(1)).next().unwrap();
    assert_eq!(poison.kind, EffectKind::Poisoned);
    assert_eq!(poison.remaining_ticks, 2);

    // wait out the second round: another tick lands, then the record lapses
    let snapshot = turn(encounter.resume(pass(&snapshot)).unwrap());
    assert_eq!(snapshot.enemies[0].hit_points.current, 1);
    assert_eq!(snapshot.effects_on(CombatantId(1)).count(), 0);

    match encounter
        .resume(act(&snapshot, "strike:poisoned_blade", CombatantId(1)))
        .unwrap()
    {
        Step::Finished(result) => assert_eq!(result.winner, PartyId::First),
        Step::Turn(snapshot) => panic!("unexpected suspension: {snapshot:?}"),
    }
}

#[test]
fn channelled_blast_detonates_on_expiry() {
    let caster = Fighter::new(0, "Mirell", 30, 10).learn(combat_content::channel_blast());
    let victim = Fighter::new(1, "Bandit", 20, 0);
    let mut encounter = Encounter::new(
        party(vec![caster]),
        party(vec![victim]),
        fixed(&[0, 1]),
    )
    .unwrap();

    let snapshot = turn(encounter.start().unwrap());
    let snapshot = turn(
        encounter
            .resume(act(&snapshot, "cast:channel_blast", CombatantId(1)))
            .unwrap(),
    );

    // now the victim's turn; the channel is still held
    assert_eq!(snapshot.active.id, CombatantId(1));
    assert!(
        snapshot
            .effects_on(CombatantId(0))
            .any(|e| e.kind == EffectKind::Channeling)
    );

    // the victim's turn ends the round and the blast lands
    let snapshot = turn(encounter.resume(pass(&snapshot)).unwrap());
    assert_eq!(snapshot.active.id, CombatantId(0));
    assert_eq!(snapshot.active.mana.current, 6);
    assert_eq!(snapshot.enemies[0].hit_points.current, 8);
    assert_eq!(snapshot.effects_on(CombatantId(0)).count(), 0);
}

#[test]
fn silencing_the_caster_snuffs_the_channel() {
    let caster = Fighter::new(0, "Mirell", 30, 10).learn(combat_content::channel_blast());
    let witch = Fighter::new(1, "Witch", 20, 8).learn(combat_content::hex_of_silence());
    let mut encounter = Encounter::new(
        party(vec![caster]),
        party(vec![witch]),
        fixed(&[0, 1]),
    )
    .unwrap();

    let snapshot = turn(encounter.start().unwrap());
    let snapshot = turn(
        encounter
            .resume(act(&snapshot, "cast:channel_blast", CombatantId(1)))
            .unwrap(),
    );

    // the witch cuts the caster's voice; the held blast dies with it
    let snapshot = turn(
        encounter
            .resume(act(&snapshot, "cast:hex_of_silence", CombatantId(0)))
            .unwrap(),
    );
    assert_eq!(snapshot.active.id, CombatantId(0));
    let kinds: Vec<_> = snapshot.effects_on(CombatantId(0)).map(|e| e.kind).collect();
    assert_eq!(kinds, vec![EffectKind::Silenced]);
    assert_eq!(snapshot.enemies[0].hit_points.current, 20);

    // recasting while silenced fizzles without consuming the turn
    let snapshot = turn(
        encounter
            .resume(act(&snapshot, "cast:channel_blast", CombatantId(1)))
            .unwrap(),
    );
    assert_eq!(snapshot.active.id, CombatantId(0));
    assert_eq!(snapshot.active.mana.current, 6);
}

#[test]
fn satchel_opens_without_consuming_the_turn() {
    let satchel = Satchel::new(1).into_handle();
    let drink = satchel.drink_potion();
    let hero = Fighter::new(0, "Aldric", 30, 0).equip(satchel.clone());
    let bandit = armed(1, "Bandit", 40).with_tactic(Box::new(SimpleTactic));
    let mut encounter = Encounter::new(
        party(vec![hero]),
        party(vec![bandit]),
        fixed(&[1, 0]),
    )
    .unwrap();

    // the bandit lands a hit before the hero's first snapshot
    let snapshot = turn(encounter.start().unwrap());
    assert_eq!(snapshot.active.id, CombatantId(0));
    assert_eq!(snapshot.active.hit_points.current, 24);

    // rummaging executes but never consumes the turn: same actor, same turn
    let open = snapshot.offered_action("use_item").unwrap().clone();
    let snapshot = turn(
        encounter
            .resume(Decision::act_on(open, CombatantId(0)))
            .unwrap(),
    );
    assert_eq!(snapshot.active.id, CombatantId(0));
    assert_eq!(snapshot.turn, 1);

    // drinking consumes the turn and the potion
    let snapshot = turn(
        encounter
            .resume(Decision::act_on(drink.clone(), CombatantId(0)))
            .unwrap(),
    );
    assert_eq!(snapshot.active.id, CombatantId(0));
    assert_eq!(snapshot.active.hit_points.current, 24); // healed 6, struck for 6
    assert_eq!(satchel.potions_left(), 0);

    // an empty satchel pours nothing and the turn stays
    let snapshot = turn(
        encounter
            .resume(Decision::act_on(drink, CombatantId(0)))
            .unwrap(),
    );
    assert_eq!(snapshot.active.id, CombatantId(0));
}

#[test]
fn drink_action_is_discoverable_from_the_offered_opener() {
    let hero = Fighter::new(0, "Aldric", 30, 0).equip(Satchel::new(1).into_handle());
    let bandit = armed(1, "Bandit", 40).with_tactic(Box::new(SimpleTactic));
    let mut encounter = Encounter::new(
        party(vec![hero]),
        party(vec![bandit]),
        fixed(&[1, 0]),
    )
    .unwrap();

    // the bandit strikes first, so there is a wound to heal
    let snapshot = turn(encounter.start().unwrap());
    assert_eq!(snapshot.active.hit_points.current, 24);

    // no satchel handle held out of band: the drink comes off the opener
    let open = snapshot.offered_action("use_item").unwrap().clone();
    let drink = open
        .children()
        .into_iter()
        .find(|a| a.id().as_str() == "drink:healing_potion")
        .expect("drink listed under the opener");

    // healed 6 to the cap, then struck for 6 before the next snapshot
    let snapshot = turn(
        encounter
            .resume(Decision::act_on(drink, CombatantId(0)))
            .unwrap(),
    );
    assert_eq!(snapshot.active.hit_points.current, 24);
}

#[test]
fn stunned_bandit_loses_its_turn() {
    let hero = Fighter::new(0, "Aldric", 30, 0).equip(stunning_mace());
    let bandit = armed(1, "Bandit", 30).with_tactic(Box::new(SimpleTactic));
    let mut encounter = Encounter::new(
        party(vec![hero]),
        party(vec![bandit]),
        fixed(&[0, 1]),
    )
    .unwrap();

    let snapshot = turn(encounter.start().unwrap());
    let snapshot = turn(
        encounter
            .resume(act(&snapshot, "strike:stunning_mace", CombatantId(1)))
            .unwrap(),
    );

    // the bandit spent its turn incapacitated instead of striking back
    assert_eq!(snapshot.active.hit_points.current, 30);
    assert_eq!(snapshot.enemies[0].hit_points.current, 27);
    assert_eq!(snapshot.effects_on(CombatantId(1)).count(), 0); // stun lapsed
}

#[test]
fn ember_burns_on_every_tick() {
    let hero = Fighter::new(0, "Mirell", 40, 10).learn(combat_content::ember());
    let bandit = armed(1, "Bandit", 10).with_tactic(Box::new(SimpleTactic));
    let mut encounter = Encounter::new(
        party(vec![hero]),
        party(vec![bandit]),
        fixed(&[0, 1]),
    )
    .unwrap();

    let snapshot = turn(encounter.start().unwrap());
    let snapshot = turn(
        encounter
            .resume(act(&snapshot, "cast:ember", CombatantId(1)))
            .unwrap(),
    );

    // one round of burning: two ticks at 2 damage each, then gone
    assert_eq!(snapshot.enemies[0].hit_points.current, 6);
    assert_eq!(snapshot.effects_on(CombatantId(1)).count(), 0);
}

#[test]
fn regrowth_knits_and_surges_on_expiry() {
    let hero = Fighter::new(0, "Aldric", 30, 4).learn(combat_content::regrowth());
    let bandit = armed(1, "Bandit", 60).with_tactic(Box::new(SimpleTactic));
    let mut encounter = Encounter::new(
        party(vec![hero]),
        party(vec![bandit]),
        fixed(&[1, 0]),
    )
    .unwrap();

    // struck for 6, then cast on self: +2 at the first round boundary,
    // struck again, nothing mid-round
    let snapshot = turn(encounter.start().unwrap());
    assert_eq!(snapshot.active.hit_points.current, 24);
    let snapshot = turn(
        encounter
            .resume(act(&snapshot, "cast:regrowth", CombatantId(0)))
            .unwrap(),
    );
    assert_eq!(snapshot.active.hit_points.current, 20);
    assert_eq!(
        snapshot
            .effects_on(CombatantId(0))
            .next()
            .unwrap()
            .remaining_ticks,
        2
    );

    // second round: +2 on the boundary, struck for 6, +3 as the spell lapses
    let snapshot = turn(encounter.resume(pass(&snapshot)).unwrap());
    assert_eq!(snapshot.active.hit_points.current, 19);
    assert_eq!(snapshot.effects_on(CombatantId(0)).count(), 0);
}

#[test]
fn practice_is_tallied_for_external_fighters() {
    let hero = armed(0, "Aldric", 30);
    let tally = hero.practice_tally();
    let bandit = armed(1, "Bandit", 30).with_tactic(Box::new(SimpleTactic));
    let mut encounter = Encounter::new(
        party(vec![hero]),
        party(vec![bandit]),
        fixed(&[0, 1]),
    )
    .unwrap();

    let snapshot = turn(encounter.start().unwrap());
    encounter
        .resume(act(&snapshot, "strike:shortsword", CombatantId(1)))
        .unwrap();

    let tally = tally.lock().unwrap();
    assert_eq!(tally.get(&"swordplay".into()), Some(&1));
    assert_eq!(tally.len(), 1); // the autonomous bandit tallies nothing
}

#[cfg(feature = "loaders")]
mod loaded {
    use super::*;
    use combat_content::demo_encounter;

    #[test]
    fn demo_encounter_suspends_on_the_hero_party() {
        let (first, second, config) = demo_encounter().unwrap();
        let mut encounter = Encounter::new(first, second, config).unwrap();

        let snapshot = turn(encounter.start().unwrap());
        assert!(snapshot.active.id == CombatantId(0) || snapshot.active.id == CombatantId(1));
        assert!(!snapshot.offered.is_empty());
    }

    #[test]
    fn seeded_initiative_is_fixed_and_reproducible() {
        let build = || {
            let (first, second, config) = demo_encounter().unwrap();
            Encounter::new(first, second, config).unwrap()
        };
        let a = build();
        let b = build();
        assert_eq!(a.initiative(), b.initiative());

        let mut drawn = a.initiative().to_vec();
        drawn.sort_unstable();
        assert_eq!(drawn, (0..4).map(CombatantId).collect::<Vec<_>>());
    }
}
