//! Title-pattern rules that decide an event's color and reminders.
//!
//! A [`RuleSet`] is an ordered list of rules. Every rule whose matcher accepts
//! the summary fires, in order: color is last-writer-wins, reminders are the
//! union of minute offsets, and an explicit clear drops everything added
//! before it in the same pass.

use tracing::debug;

use crate::event::Event;
use crate::light::LightColor;
use crate::palette::Color;

/// Predicate over an event summary
#[derive(Debug, Clone, PartialEq)]
pub enum Matcher {
    Always,
    Contains { needle: String, case_sensitive: bool },
    All(Vec<Matcher>),
    Any(Vec<Matcher>),
    Not(Box<Matcher>),
}

impl Matcher {
    pub fn contains(needle: &str) -> Self {
        Matcher::Contains {
            needle: needle.to_string(),
            case_sensitive: true,
        }
    }

    pub fn contains_ignore_case(needle: &str) -> Self {
        Matcher::Contains {
            needle: needle.to_lowercase(),
            case_sensitive: false,
        }
    }

    pub fn not(inner: Matcher) -> Self {
        Matcher::Not(Box::new(inner))
    }

    pub fn matches(&self, summary: &str) -> bool {
        match self {
            Matcher::Always => true,
            Matcher::Contains {
                needle,
                case_sensitive: true,
            } => summary.contains(needle.as_str()),
            Matcher::Contains {
                needle,
                case_sensitive: false,
            } => summary.to_lowercase().contains(needle.as_str()),
            Matcher::All(inner) => inner.iter().all(|m| m.matches(summary)),
            Matcher::Any(inner) => inner.iter().any(|m| m.matches(summary)),
            Matcher::Not(inner) => !inner.matches(summary),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Gray color, default reminders
    Reset,
    SetColor(Color),
    AddReminders(Vec<i64>),
    ClearReminders,
}

impl Effect {
    fn apply(&self, event: &mut Event) {
        match self {
            Effect::Reset => {
                event.color = Some(Color::Gray);
                event.reminders.clear();
            }
            Effect::SetColor(color) => event.color = Some(*color),
            Effect::AddReminders(minutes) => {
                for m in minutes {
                    event.reminders.add_minutes(*m);
                }
            }
            Effect::ClearReminders => event.reminders.clear(),
        }
    }
}

/// What a rule does to the lights when it matches an in-progress event
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum LightEffect {
    #[default]
    Keep,
    Set(LightColor),
    Off,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub name: &'static str,
    pub matcher: Matcher,
    pub effects: Vec<Effect>,
    pub light: LightEffect,
    /// Position in the owning [`RuleSet`]; later rules win
    pub priority: usize,
}

impl Rule {
    pub fn new(name: &'static str, matcher: Matcher) -> Self {
        Rule {
            name,
            matcher,
            effects: Vec::new(),
            light: LightEffect::Keep,
            priority: 0,
        }
    }

    pub fn reset(mut self) -> Self {
        self.effects.push(Effect::Reset);
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.effects.push(Effect::SetColor(color));
        self
    }

    pub fn remind(mut self, minutes: &[i64]) -> Self {
        self.effects.push(Effect::AddReminders(minutes.to_vec()));
        self
    }

    pub fn clear_reminders(mut self) -> Self {
        self.effects.push(Effect::ClearReminders);
        self
    }

    pub fn light(mut self, light: LightEffect) -> Self {
        self.light = light;
        self
    }

    pub fn matches(&self, summary: &str) -> bool {
        self.matcher.matches(summary)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        let rules = rules
            .into_iter()
            .enumerate()
            .map(|(priority, rule)| Rule { priority, ..rule })
            .collect();
        RuleSet { rules }
    }

    /// The Winter Olympics table used by the CLI.
    pub fn olympics() -> Self {
        let usa = || Matcher::contains("USA");
        let curling = || Matcher::contains_ignore_case("curling");

        RuleSet::new(vec![
            Rule::new("baseline reset", Matcher::Always)
                .reset()
                .light(LightEffect::Off),
            Rule::new("gold medal", Matcher::contains("🏅"))
                .color(Color::Yellow)
                .remind(&[5, 1440])
                .light(LightEffect::Set(LightColor::GOLD)),
            Rule::new("team usa", usa())
                .color(Color::LightBlue)
                .remind(&[5])
                .light(LightEffect::Set(LightColor::BLUE)),
            Rule::new(
                "curling final",
                Matcher::All(vec![
                    curling(),
                    Matcher::not(Matcher::contains_ignore_case("round robin")),
                ]),
            )
            .color(Color::DarkBlue)
            .light(LightEffect::Set(LightColor::DEEP_BLUE)),
            Rule::new("usa curling", Matcher::All(vec![usa(), curling()])).remind(&[30, 1440]),
            Rule::new(
                "skiing",
                Matcher::Any(vec![
                    Matcher::contains_ignore_case("skiing"),
                    Matcher::contains_ignore_case("ski "),
                    Matcher::contains_ignore_case("alpine"),
                ]),
            )
            .color(Color::Green)
            .remind(&[5])
            .light(LightEffect::Set(LightColor::GREEN)),
            Rule::new("hockey", Matcher::contains_ignore_case("hockey"))
                .color(Color::Gray)
                .clear_reminders()
                .light(LightEffect::Off),
        ])
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Rules whose matcher accepts `summary`, in priority order.
    pub fn matching<'a>(&'a self, summary: &'a str) -> impl Iterator<Item = &'a Rule> + 'a {
        self.rules.iter().filter(move |r| r.matches(summary))
    }

    /// Apply every matching rule to `event` in place.
    /// Returns the names of the rules that fired.
    pub fn apply(&self, event: &mut Event) -> Vec<&'static str> {
        let summary = event.summary.clone();
        let mut fired = Vec::new();

        for rule in self.matching(&summary) {
            for effect in &rule.effects {
                effect.apply(event);
            }
            fired.push(rule.name);
        }

        debug!(
            "Rules [{}] -> color {}, reminders {} for: {}",
            fired.join(", "),
            event.color.map(|c| c.name()).unwrap_or("default"),
            event.reminders,
            event.summary
        );

        fired
    }

    /// The light the rule table asks for while `summary` is in progress, with
    /// the priority of the rule that decided it. Last writer wins, like color.
    pub fn light_for(&self, summary: &str) -> Option<(usize, LightColor)> {
        let mut current = None;

        for rule in self.matching(summary) {
            match rule.light {
                LightEffect::Keep => {}
                LightEffect::Set(color) => current = Some((rule.priority, color)),
                LightEffect::Off => current = None,
            }
        }

        current
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        RuleSet::olympics()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Reminders;
    use crate::testing::event;
    use std::collections::BTreeSet;

    fn applied(summary: &str) -> Event {
        let mut e = event("1", summary);
        RuleSet::olympics().apply(&mut e);
        e
    }

    #[test]
    fn usa_round_robin_curling_keeps_light_blue_and_unions_reminders() {
        let e = applied("USA vs Canada Curling - Round Robin");

        assert_eq!(e.color, Some(Color::LightBlue));
        assert_eq!(e.reminders.minutes(), BTreeSet::from([5, 30, 1440]));
    }

    #[test]
    fn non_round_robin_curling_gets_dark_blue() {
        let e = applied("Women's Curling Semifinal");
        assert_eq!(e.color, Some(Color::DarkBlue));
        assert!(e.reminders.is_default());

        let e = applied("USA vs Sweden Curling Bronze Medal Game");
        assert_eq!(e.color, Some(Color::DarkBlue));
        assert_eq!(e.reminders.minutes(), BTreeSet::from([5, 30, 1440]));
    }

    #[test]
    fn hockey_clear_wins_over_gold_medal() {
        let e = applied("Men's Hockey Gold Medal Match 🏅");

        assert_eq!(e.color, Some(Color::Gray));
        assert_eq!(e.reminders, Reminders::Default);
    }

    #[test]
    fn gold_medal_gets_yellow_and_two_reminders() {
        let e = applied("Figure Skating Pairs Free 🏅");

        assert_eq!(e.color, Some(Color::Yellow));
        assert_eq!(e.reminders.minutes(), BTreeSet::from([5, 1440]));
    }

    #[test]
    fn reminder_union_is_independent_of_rule_order() {
        let five = Rule::new("five", Matcher::Always).remind(&[5]);
        let day = Rule::new("day", Matcher::Always).remind(&[1440, 5]);

        let mut a = event("1", "x");
        RuleSet::new(vec![five.clone(), day.clone()]).apply(&mut a);
        let mut b = event("1", "x");
        RuleSet::new(vec![day, five]).apply(&mut b);

        assert_eq!(a.reminders, b.reminders);
        assert_eq!(a.reminders.minutes(), BTreeSet::from([5, 1440]));
    }

    #[test]
    fn applying_twice_is_idempotent() {
        let rules = RuleSet::olympics();
        for summary in [
            "USA vs Canada Curling - Round Robin",
            "Men's Hockey Gold Medal Match 🏅",
            "Alpine Skiing: Men's Downhill 🏅",
            "Luge Doubles",
        ] {
            let mut once = event("1", summary);
            once.color = Some(Color::Red);
            once.reminders = Reminders::with_minutes([10]);
            rules.apply(&mut once);

            let mut twice = once.clone();
            rules.apply(&mut twice);

            assert_eq!(once, twice, "not idempotent for {}", summary);
        }
    }

    #[test]
    fn reset_clears_stale_state() {
        let mut e = event("1", "Luge Doubles");
        e.color = Some(Color::Red);
        e.reminders = Reminders::with_minutes([10]);

        let rules = RuleSet::olympics();
        let fired = rules.apply(&mut e);

        assert_eq!(fired, vec!["baseline reset"]);
        assert_eq!(e.color, Some(Color::Gray));
        assert!(e.reminders.is_default());
    }

    #[test]
    fn matchers_handle_case_and_emoji() {
        assert!(Matcher::contains_ignore_case("CURLING").matches("mixed doubles curling"));
        assert!(!Matcher::contains("USA").matches("usa hockey"));
        assert!(Matcher::contains("🏅").matches("Final🏅"));
        assert!(!Matcher::contains("🏅").matches("Final 🥉"));
    }

    #[test]
    fn multiple_markers_fire_every_matching_rule() {
        let rules = RuleSet::olympics();
        let names: Vec<_> = rules
            .matching("USA Men's Curling – Round Robin")
            .map(|r| r.name)
            .collect();

        assert_eq!(names, vec!["baseline reset", "team usa", "usa curling"]);
    }

    #[test]
    fn light_follows_last_writer() {
        let rules = RuleSet::olympics();

        assert_eq!(rules.light_for("Luge Doubles"), None);
        assert_eq!(
            rules.light_for("Speed Skating 🏅").map(|(_, c)| c),
            Some(LightColor::GOLD)
        );
        assert_eq!(
            rules.light_for("USA Speed Skating 🏅").map(|(_, c)| c),
            Some(LightColor::BLUE)
        );
        assert_eq!(rules.light_for("USA Hockey 🏅"), None);
    }

    #[test]
    fn priority_follows_table_position() {
        let rules = RuleSet::olympics();
        let priorities: Vec<_> = rules.rules().iter().map(|r| r.priority).collect();

        assert_eq!(priorities, (0..rules.rules().len()).collect::<Vec<_>>());
        assert_eq!(rules.light_for("Men's Downhill Skiing 🏅"), Some((5, LightColor::GREEN)));
    }
}
