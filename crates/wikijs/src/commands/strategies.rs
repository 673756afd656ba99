//! Authentication strategy command handlers.

use tabled::Tabled;
use wikijs_api::{ActiveAuthenticationStrategy, AuthenticationStrategy, WikijsClient};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

/// What an authenticated run reads.
#[derive(Debug)]
pub enum Query {
    All,
    Active,
    One(String),
}

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct StrategyRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Available")]
    available: String,
    #[tabled(rename = "Form")]
    use_form: String,
    #[tabled(rename = "Username")]
    username_type: String,
}

impl From<&AuthenticationStrategy> for StrategyRow {
    fn from(s: &AuthenticationStrategy) -> Self {
        Self {
            key: s.key.clone(),
            title: s.title.clone(),
            available: yes_no(s.is_available),
            use_form: yes_no(s.use_form),
            username_type: s.username_type.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct ActiveRow {
    #[tabled(rename = "Order")]
    order: i64,
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Strategy")]
    strategy: String,
    #[tabled(rename = "Name")]
    display_name: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
    #[tabled(rename = "Self-Reg")]
    self_registration: String,
}

impl From<&ActiveAuthenticationStrategy> for ActiveRow {
    fn from(s: &ActiveAuthenticationStrategy) -> Self {
        Self {
            order: s.order,
            key: s.key.clone(),
            strategy: s.strategy.key.clone(),
            display_name: s.display_name.clone(),
            enabled: yes_no(s.is_enabled),
            self_registration: yes_no(s.self_registration),
        }
    }
}

fn yes_no(value: bool) -> String {
    String::from(if value { "yes" } else { "no" })
}

fn detail(s: &AuthenticationStrategy) -> String {
    let props = s
        .props
        .iter()
        .map(|p| p.key.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    output::detail_lines(&[
        ("Key", s.key.clone()),
        ("Title", s.title.clone()),
        ("Description", s.description.clone().unwrap_or_default()),
        ("Available", yes_no(s.is_available)),
        ("Uses form", yes_no(s.use_form)),
        ("Username", s.username_type.clone().unwrap_or_default()),
        ("Website", s.website.clone().unwrap_or_default()),
        ("Props", props),
    ])
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn handle(
    client: &WikijsClient,
    query: &Query,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let out = match query {
        Query::All => {
            let all = client.authentication_strategies().await?;
            output::render_list(&global.output, &all, |s| StrategyRow::from(s), |s| s.key.clone())?
        }
        Query::Active => {
            let mut active = client.active_authentication_strategies().await?;
            active.sort_by_key(|s| s.order);
            output::render_list(&global.output, &active, |s| ActiveRow::from(s), |s| s.key.clone())?
        }
        Query::One(key) => {
            let strategy = client.authentication_strategy(key).await?;
            output::render_single(&global.output, &strategy, detail, |s| s.key.clone())?
        }
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
