//! Answer command handlers.

use uuid::Uuid;

use dnscontroller_api::DnsClient;
use dnscontroller_core::{Answer, Detail, parse_answers};

use crate::cli::{AddAnswerArgs, AnswersArgs, AnswersCommand, GlobalOpts};
use crate::error::CliError;

use super::records::print_record;

/// Build the batch to send: the file's answers, or one answer from flags.
/// Either way the answers are validated here before anything is sent.
fn answers_from_args(args: &AddAnswerArgs) -> Result<Vec<Answer>, CliError> {
    if let Some(ref path) = args.file {
        let body = std::fs::read(path)?;
        return Ok(parse_answers(&body)?);
    }

    let (Some(target), Some(owner)) = (args.target.as_deref(), args.owner) else {
        return Err(CliError::Validation {
            field: "answer".into(),
            reason: "--target and --owner are required without --file".into(),
        });
    };

    let answer_type = args
        .answer_type
        .as_deref()
        .unwrap_or(&args.record.record_type);

    let mut answer = Answer::new(target, answer_type, args.ttl, owner, Uuid::nil());
    if let Some(port) = args.port {
        answer = answer.with_detail(Detail::new(
            Uuid::nil(),
            port,
            args.priority,
            args.weight,
            &args.protocol,
        ));
    }

    answer.validate().map_err(|e| CliError::Validation {
        field: "answer".into(),
        reason: e.to_string(),
    })?;

    Ok(vec![answer])
}

pub async fn handle(
    client: &DnsClient,
    args: AnswersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        AnswersCommand::Add(args) => {
            let answers = answers_from_args(&args)?;
            tracing::debug!(count = answers.len(), "sending answers");

            let record = client
                .create_answers(&args.record.name, &args.record.record_type, &answers)
                .await
                .map_err(|e| {
                    CliError::from_api(
                        e,
                        client.base_url().as_str(),
                        &args.record.name,
                        &args.record.record_type,
                    )
                })?;

            print_record(&record, global)
        }
    }
}
