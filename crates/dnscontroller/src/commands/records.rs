//! Record command handlers.

use std::fmt::Write as _;

use tabled::Tabled;

use dnscontroller_api::DnsClient;
use dnscontroller_core::{Answer, Record};

use crate::cli::{GlobalOpts, RecordRef, RecordsArgs, RecordsCommand};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub(crate) struct AnswerRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Type")]
    answer_type: String,
    #[tabled(rename = "TTL")]
    ttl: u64,
    #[tabled(rename = "Details")]
    details: String,
    #[tabled(rename = "Owner")]
    owner: String,
}

impl From<&Answer> for AnswerRow {
    fn from(a: &Answer) -> Self {
        let details = a
            .details
            .iter()
            .map(|d| format!("{}/{} prio={} weight={}", d.port, d.protocol, d.priority, d.weight))
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            id: a.id.to_string(),
            target: a.target.clone(),
            answer_type: a.answer_type.clone(),
            ttl: a.ttl,
            details,
            owner: a.owner_id.to_string(),
        }
    }
}

/// Header lines plus an answers table.
pub(crate) fn record_detail(r: &Record) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Record:   {}", r.name);
    let _ = writeln!(out, "Type:     {}", r.record_type);
    let _ = writeln!(out, "ID:       {}", r.id);
    if let Some(created) = r.created_at {
        let _ = writeln!(out, "Created:  {}", created.to_rfc3339());
    }

    if r.answers().is_empty() {
        let _ = write!(out, "Answers:  none");
    } else {
        let rows: Vec<AnswerRow> = r.answers().iter().map(AnswerRow::from).collect();
        let _ = write!(out, "Answers:\n{}", output::render_table(&rows));
    }
    out
}

/// One answer target per line, or the record id when it has none.
pub(crate) fn record_plain(r: &Record) -> String {
    if r.answers().is_empty() {
        r.id.to_string()
    } else {
        r.answers()
            .iter()
            .map(|a| a.target.clone())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub(crate) fn print_record(record: &Record, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(&global.output, record, record_detail, record_plain)?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &DnsClient,
    args: RecordsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let server = client.base_url().to_string();
    let api_err = |r: &RecordRef| {
        let (name, rtype) = (r.name.clone(), r.record_type.clone());
        let server = server.clone();
        move |e: dnscontroller_api::Error| CliError::from_api(e, &server, &name, &rtype)
    };

    match args.command {
        RecordsCommand::Get(r) => {
            let record = client
                .get_record(&r.name, &r.record_type)
                .await
                .map_err(api_err(&r))?;
            print_record(&record, global)
        }

        RecordsCommand::Create(r) => {
            let record = client
                .create_record(&r.name, &r.record_type)
                .await
                .map_err(api_err(&r))?;
            print_record(&record, global)
        }

        RecordsCommand::Delete(r) => {
            client
                .delete_record(&r.name, &r.record_type)
                .await
                .map_err(api_err(&r))?;
            if !global.quiet {
                eprintln!("Deleted record {}/{}", r.name, r.record_type);
            }
            Ok(())
        }
    }
}
