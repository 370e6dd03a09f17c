//! The `jagdkurs init` command.

use anyhow::Result;

use jagdkurs_providers::config::STARTER_CONFIG;

pub fn execute() -> Result<()> {
    if std::path::Path::new("jagdkurs.toml").exists() {
        println!("jagdkurs.toml already exists, skipping.");
    } else {
        std::fs::write("jagdkurs.toml", STARTER_CONFIG)?;
        println!("Created jagdkurs.toml");
    }

    println!("\nNext steps:");
    println!("  1. Set OPENAI_API_KEY (or leave it unset for offline grading)");
    println!("  2. Run: jagdkurs validate");
    println!("  3. Run: jagdkurs generate --subject Wildkunde");

    Ok(())
}
