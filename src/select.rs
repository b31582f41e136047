//! Instance disambiguation.
//!
//! When a name matches more than one instance the user picks exactly one,
//! or bails out with `0`. The prompt itself is behind [`ChoiceProvider`] so
//! the selection rules are testable without a terminal.

use console::style;
use dialoguer::Input;

use crate::error::{CourirError, Result};
use crate::inventory::Instance;

/// Supplies one integer choice in `[0, count]`.
///
/// `0` always means "none of these". Implementations may return any usize;
/// range checking happens in [`select_instance`].
pub trait ChoiceProvider {
    fn choose(&mut self, count: usize) -> Result<usize>;
}

/// Interactive prompt on the local terminal.
pub struct PromptChoice;

impl ChoiceProvider for PromptChoice {
    fn choose(&mut self, _count: usize) -> Result<usize> {
        let choice: usize = Input::new()
            .with_prompt("Please choose an instance")
            .interact_text()?;
        Ok(choice)
    }
}

/// Pick exactly one instance out of the matches for `name`.
///
/// Returns `Ok(None)` when the user chose `0` (clean abort). Matches are
/// kept in discovery order; the menu numbers them 1..N.
pub fn select_instance<'a>(
    matches: &'a [Instance],
    name: &str,
    chooser: &mut dyn ChoiceProvider,
) -> Result<Option<&'a Instance>> {
    match matches.len() {
        0 => Err(CourirError::InstanceNotFound(name.to_string())),
        1 => Ok(Some(&matches[0])),
        count => {
            println!("0) {}", style("None, I will filter more").dim());
            for (i, instance) in matches.iter().enumerate() {
                println!("{}) {} - {}", i + 1, style(&instance.id).bold(), instance.ip);
            }

            match chooser.choose(count)? {
                0 => Ok(None),
                choice if choice <= count => Ok(Some(&matches[choice - 1])),
                choice => Err(CourirError::InvalidSelection {
                    chosen: choice,
                    max: count,
                }),
            }
        }
    }
}
