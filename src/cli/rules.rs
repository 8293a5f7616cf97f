//! `pagetune rules`: print the speculation rules document.

use anyhow::Result;
use pagetune::speculation::{SpeculationRuleBuilder, SpeculationRuleDoc};
use pagetune::{PagetuneConfig, log};

pub fn print_rules(config: &PagetuneConfig) -> Result<()> {
    println!("{}", render_rules(&SpeculationRuleBuilder::from_config(config).build())?);

    if !config.speculation.enable {
        log!("rules"; "speculation is disabled, the rules are not added to pages");
    }
    Ok(())
}

fn render_rules(doc: &SpeculationRuleDoc) -> Result<String> {
    Ok(serde_json::to_string_pretty(doc)?)
}
