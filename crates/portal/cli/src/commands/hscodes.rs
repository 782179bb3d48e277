//! HS code search

use crate::output::{print_info, print_output, OutputFormat};
use clap::Args;
use portal_client::PortalClient;
use portal_types::{HsCode, HsCodeQuery};
use serde::Serialize;
use tabled::Tabled;

#[derive(Args)]
pub struct HsCodeArgs {
    /// Code prefix, e.g. 0902
    prefix: Option<String>,

    /// Maximum number of results
    #[arg(short, long, default_value = "20")]
    limit: u32,

    /// Results to skip
    #[arg(long, default_value = "0")]
    offset: u32,
}

impl HsCodeArgs {
    fn query(&self) -> HsCodeQuery {
        HsCodeQuery {
            starts_with: self.prefix.clone(),
            ..HsCodeQuery::default()
        }
        .with_limit(self.limit)
        .with_offset(self.offset)
    }
}

pub async fn execute(args: HsCodeArgs, client: &PortalClient, format: OutputFormat) -> anyhow::Result<()> {
    let page = client.search_hs_codes(&args.query()).await?;
    let total = page.total;
    let rows: Vec<HsCodeRow> = page.items.into_iter().map(Into::into).collect();
    let end = args.offset as u64 + rows.len() as u64;

    print_output(rows, format)?;
    if let OutputFormat::Table = format {
        if end < total {
            print_info(&format!(
                "{} more; use --offset {} for the next page",
                total - end,
                end
            ));
        }
    }
    Ok(())
}

#[derive(Debug, Serialize, Tabled)]
struct HsCodeRow {
    code: String,
    description: String,
    category: String,
}

impl From<HsCode> for HsCodeRow {
    fn from(h: HsCode) -> Self {
        Self {
            code: h.hs_code,
            description: h.description,
            category: h.category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_from_args() {
        let args = HsCodeArgs {
            prefix: Some("0902".into()),
            limit: 10,
            offset: 20,
        };
        assert_eq!(
            args.query().to_pairs(),
            vec![
                ("hsCodeStartsWith", "0902".to_string()),
                ("limit", "10".to_string()),
                ("offset", "20".to_string()),
            ]
        );
    }
}
