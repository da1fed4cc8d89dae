//! Check command - Prints the resolved settings without secrets.

use crate::cli::args::CheckArgs;
use crate::config::{Settings, SettingsSummary};
use crate::errors::{AppError, AppResult};

/// Execute the check command
pub fn execute(args: CheckArgs, settings: Settings) -> AppResult<()> {
    let summary = settings.summary();

    if args.json {
        let json = serde_json::to_string_pretty(&summary)
            .map_err(|e| AppError::internal(format!("Failed to serialize settings: {}", e)))?;
        println!("{}", json);
    } else {
        print!("{}", render_text(&summary));
    }

    Ok(())
}

fn render_text(summary: &SettingsSummary) -> String {
    let apps: Vec<&str> = summary.installed_apps.iter().map(|app| app.label()).collect();
    let mut out = String::new();
    out.push_str(&format!("debug:                {}\n", summary.debug));
    out.push_str(&format!("listen:               {}\n", summary.server_addr));
    out.push_str(&format!("database:             {:?}\n", summary.database));
    out.push_str(&format!(
        "email:                {:?} ({:?})\n",
        summary.email_backend, summary.email_security
    ));
    out.push_str(&format!("allowed hosts:        {}\n", summary.allowed_hosts.join(", ")));
    out.push_str(&format!(
        "trusted origins:      {}\n",
        summary.csrf_trusted_origins.join(", ")
    ));
    out.push_str(&format!("installed apps:       {}\n", apps.join(", ")));
    out.push_str(&format!("languages:            {}\n", summary.languages.join(", ")));
    out.push_str(&format!("serves static/media:  {}\n", summary.serves_local_assets));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Env;
    use std::path::Path;

    #[test]
    fn test_text_summary_has_no_secrets() {
        let env = Env::from_pairs([
            ("DEBUG", "true"),
            ("EMAIL_HOST_PASSWORD", "hunter2-mail"),
            ("DB_PASSWORD", "hunter2-db"),
        ]);
        let settings = Settings::from_source(&env, Path::new(".")).unwrap();
        let text = render_text(&settings.summary());

        assert!(text.contains("installed apps:"));
        assert!(text.contains("en, it"));
        assert!(!text.contains("hunter2"));
        assert!(!text.contains("dev-insecure"));
    }
}
