//! Testing utilities for the SRD data layer.
//!
//! A small corpus in the same markdown shape as the real SRD chapters, so
//! parser and search tests don't need the full rulebook on disk:
//! - ten monsters (one deliberately malformed), four animals
//! - eight spells (one whose spell line matches neither form)

use crate::corpus::SrdCorpus;

/// Sample monster chapter.
pub const MONSTERS_MD: &str = r#"# Monsters A-Z

Monsters are presented in alphabetical order.

## Aboleth

*Large Aberration, Lawful Evil*

**Armor Class:** 17
**Hit Points:** 150 (20d10 + 40)
**Speed:** 10 ft., Swim 40 ft.
**Initiative:** +7 (17)

**CR** 10 (XP 5,900, or 7,200 in lair; PB +4)

### Traits

***Amphibious.*** The aboleth can breathe air and water.

***Eldritch Restoration.*** If destroyed, the aboleth gains a new body in 5d10 days.

### Actions

***Tentacle.*** *Melee Attack Roll:* +9, reach 15 ft. *Hit:* 12 (2d6 + 5) Bludgeoning damage.

## Adult Red Dragon

*Huge Dragon (Chromatic), Chaotic Evil*

**Armor Class:** 19
**Hit Points:** 256 (19d12 + 133)
**Speed:** 40 ft., Climb 40 ft., Fly 80 ft.

**CR** 17 (XP 18,000, or 20,000 in lair; PB +6)

### Actions

***Fire Breath (Recharge 5-6).*** *Dexterity Saving Throw:* DC 21, each creature in a 60-foot Cone. *Failure:* 59 (17d6) Fire damage.

## Ghoul

*Medium Undead, Chaotic Evil*

**Armor Class:** 12
**Hit Points:** 22 (5d8)
**Speed:** 30 ft.

**CR** 1 (XP 200; PB +2)

### Actions

***Claw.*** *Melee Attack Roll:* +4, reach 5 ft. *Hit:* 5 (1d6 + 2) Slashing damage. If the target is a creature that isn't an Undead, it has the Paralyzed condition until the end of its next turn.

## Goblin Warrior

*Small Fey (Goblinoid), Chaotic Neutral*

**Armor Class:** 15
**Hit Points:** 10 (3d6)
**Speed:** 30 ft.

**CR** 1/4 (XP 50; PB +2)

### Bonus Actions

***Nimble Escape.*** The goblin takes the Disengage or Hide action.

## Hobgoblin Warrior

*Medium Fey (Goblinoid), Lawful Evil*

**Armor Class:** 18
**Hit Points:** 11 (2d8 + 2)
**Speed:** 30 ft.

**CR** 1/2 (XP 100; PB +2)

### Traits

***Pack Tactics.*** The hobgoblin has Advantage on an attack roll against a creature if at least one of the hobgoblin's allies is within 5 feet of the creature.

## Lich

*Medium Undead (Wizard), Neutral Evil*

**Armor Class:** 20
**Hit Points:** 315 (42d8 + 126)
**Speed:** 30 ft.

**CR** 21 (XP 33,000, or 41,000 in lair; PB +7)

### Traits

***Spirit Jar.*** If destroyed, the lich reforms in 1d10 days if it has a spirit jar.

## Mystery Statue

A weathered statue of uncertain origin. Its statistics were never recorded.

## Skeleton

*Medium Undead, Lawful Evil*

**Armor Class:** 14
**Hit Points:** 13 (2d8 + 4)
**Speed:** 30 ft.

**CR** 1/4 (XP 50; PB +2)

### Actions

***Shortbow.*** *Ranged Attack Roll:* +4, range 80/320 ft. *Hit:* 5 (1d6 + 2) Piercing damage.

## Wight

*Medium Undead, Neutral Evil*

**Armor Class:** 14
**Hit Points:** 82 (11d8 + 33)
**Speed:** 30 ft.

**CR** 3 (XP 700; PB +2)

### Actions

***Life Drain.*** *Melee Attack Roll:* +4, reach 5 ft. *Hit:* 6 (1d8 + 2) Necrotic damage, and the target's Hit Point maximum decreases by an amount equal to the damage taken.

## Zombie

*Medium Undead, Neutral Evil*

**Armor Class:** 8
**Hit Points:** 15 (2d8 + 6)
**Speed:** 20 ft.

**CR** 1/4 (XP 50; PB +2)

### Traits

***Undead Fortitude.*** If damage reduces the zombie to 0 Hit Points, it makes a Constitution saving throw and drops to 1 Hit Point instead on a success.
"#;

/// Sample animal chapter.
pub const ANIMALS_MD: &str = r#"# Animals

## Brown Bear

*Large Beast, Unaligned*

**Armor Class:** 11
**Hit Points:** 22 (3d10 + 6)
**Speed:** 40 ft., Climb 30 ft.

**CR** 1 (XP 200; PB +2)

## Giant Rat

*Small Beast, Unaligned*

**Armor Class:** 13
**Hit Points:** 7 (2d6)
**Speed:** 30 ft.

**CR** 1/8 (XP 25; PB +2)

## Rat

*Tiny Beast, Unaligned*

**Armor Class:** 10
**Hit Points:** 1 (1d4 - 1)
**Speed:** 20 ft., Climb 20 ft.

**CR** 0 (XP 0 or 10; PB +2)

## Wolf

*Medium Beast, Unaligned*

**Armor Class:** 12
**Hit Points:** 11 (2d8 + 2)
**Speed:** 40 ft.

**CR** 1/4 (XP 50; PB +2)

***Pack Tactics.*** The wolf has Advantage on an attack roll against a creature if at least one of the wolf's allies is within 5 feet of the creature.
"#;

/// Sample spell chapter.
pub const SPELLS_MD: &str = r#"# Spells

## Spell Descriptions

### A-F

#### **Animate Dead**

*Level 3 Necromancy (Cleric, Wizard)*

**Casting Time:** 1 minute
**Range:** 10 feet
**Components:** V, S, M (a drop of blood, a piece of flesh, and a pinch of bone dust)
**Duration:** Instantaneous

This spell creates an Undead servant. Choose a pile of bones or a corpse of a Medium or Small Humanoid within range.

#### Bless

*Level 1 Enchantment (Cleric, Paladin)*

**Casting Time:** Action
**Range:** 30 feet
**Components:** V, S, M (a Holy Water sprinkling)
**Duration:** Concentration, up to 1 minute

You bless up to three creatures within range. Whenever a target makes an attack roll or a saving throw before the spell ends, the target adds 1d4 to the attack roll or save.

#### Fire Bolt

*Evocation Cantrip (Sorcerer, Wizard)*

**Casting Time:** Action
**Range:** 120 feet
**Components:** V, S
**Duration:** Instantaneous

You hurl a mote of fire at a creature or an object within range. Make a ranged spell attack against the target. On a hit, the target takes 1d10 Fire damage.

#### Fireball

*Level 3 Evocation (Sorcerer, Wizard)*

**Casting Time:** Action
**Range:** 150 feet
**Components:** V, S, M (a ball of bat guano and sulfur)
**Duration:** Instantaneous

A bright streak flashes from you to a point you choose within range and then blossoms with a low roar into a fiery explosion. Each creature in a 20-foot-radius Sphere centered on that point makes a Dexterity saving throw, taking 8d6 Fire damage on a failed save or half as much damage on a successful one.

### G-Z

#### Hold Person

*Level 2 Enchantment (Bard, Cleric, Druid, Sorcerer, Warlock, Wizard)*

**Casting Time:** Action
**Range:** 60 feet
**Components:** V, S, M (a straight piece of iron)
**Duration:** Concentration, up to 1 minute

Choose a Humanoid that you can see within range. The target must succeed on a Wisdom saving throw or have the Paralyzed condition for the duration.

#### Mystic Scribble

*Ritual (Wizard)*

An unfinished entry with no spell line the parser recognizes.

#### Sacred Flame

*Evocation Cantrip (Cleric)*

**Casting Time:** Action
**Range:** 60 feet
**Components:** V, S
**Duration:** Instantaneous

Flame-like radiance descends on a creature that you can see within range. The target must succeed on a Dexterity saving throw or take 1d8 Radiant damage.

#### Shield

*Level 1 Abjuration (Sorcerer, Wizard)*

**Casting Time:** Reaction, which you take when you are hit by an attack roll or targeted by the Magic Missile spell
**Range:** Self
**Components:** V, S
**Duration:** 1 round

An imperceptible barrier of magical force protects you. Until the start of your next turn, you have a +5 bonus to AC.
"#;

/// The sample chapters parsed into a corpus.
pub fn sample_corpus() -> SrdCorpus {
    SrdCorpus::from_markdown(MONSTERS_MD, ANIMALS_MD, SPELLS_MD)
}

/// A monster chapter with `count` generated Beasts, CRs cycling 0..=4 in
/// reverse so sorting has work to do.
pub fn bulk_monsters(count: usize) -> String {
    let mut text = String::from("# Generated Monsters\n\n");
    for i in 0..count {
        let cr = 4 - (i % 5);
        text.push_str(&format!(
            "## Beast {i:03}\n\n*Medium Beast, Unaligned*\n\n**Armor Class:** 12\n**Hit Points:** {hp}\n**Speed:** 30 ft.\n\n**CR** {cr} (XP 100; PB +2)\n\n",
            hp = 10 + i,
        ));
    }
    text
}

/// A spell chapter with `count` generated Wizard spells, levels cycling 9..=0.
pub fn bulk_spells(count: usize) -> String {
    let mut text = String::from("# Generated Spells\n\n");
    for i in 0..count {
        let level = 9 - (i % 10);
        let line = if level == 0 {
            "*Evocation Cantrip (Wizard)*".to_string()
        } else {
            format!("*Level {level} Evocation (Wizard)*")
        };
        text.push_str(&format!(
            "#### Spell {i:03}\n\n{line}\n\n**Casting Time:** Action\n**Range:** 60 feet\n**Duration:** Instantaneous\n\n"
        ));
    }
    text
}
