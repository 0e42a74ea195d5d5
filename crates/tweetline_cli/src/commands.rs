use crate::cli::{Cli, Command};
use anyhow::{bail, Context};
use log::info;
use serde::Serialize;
use tweetline_core::db::open_db;
use tweetline_core::{
    ErrorKind, Identity, ServiceResult, SqliteRecordStore, TweetService, TweetServiceError,
};

/// JSON envelope printed for every dispatched call.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Envelope<T: Serialize> {
    Ok { ok: bool, data: T },
    Err { ok: bool, error: ErrorBody },
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub kind: &'static str,
    pub code: &'static str,
    pub message: String,
}

impl<T: Serialize> From<ServiceResult<T>> for Envelope<T> {
    fn from(result: ServiceResult<T>) -> Self {
        match result {
            Ok(data) => Self::Ok { ok: true, data },
            Err(err) => Self::Err {
                ok: false,
                error: ErrorBody::from(&err),
            },
        }
    }
}

impl From<&TweetServiceError> for ErrorBody {
    fn from(err: &TweetServiceError) -> Self {
        Self {
            kind: kind_name(err.kind()),
            code: err.code(),
            message: err.to_string(),
        }
    }
}

fn kind_name(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Validation => "validation",
        ErrorKind::NotFound => "not_found",
        ErrorKind::Unauthorized => "unauthorized",
        ErrorKind::Conflict => "conflict",
        ErrorKind::Storage => "storage",
    }
}

/// Runs one command and prints its envelope. Returns whether it succeeded.
pub fn run_command(cli: Cli) -> anyhow::Result<bool> {
    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open tweet database `{}`", cli.db.display()))?;
    let store = SqliteRecordStore::try_new(&conn).context("tweet database is not ready")?;
    let mut service = TweetService::new(store);

    info!("event=cli_dispatch module=cli status=start command={}", cli.command.name());
    let caller = || -> anyhow::Result<Identity> {
        match cli.identity.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => Ok(Identity::new(value)),
            _ => bail!(
                "`{}` needs a caller identity; pass --as or set TWEETLINE_IDENTITY",
                cli.command.name()
            ),
        }
    };

    let printed = match &cli.command {
        Command::Get(args) => emit(service.get_tweet(&args.id))?,
        Command::List => emit(service.list_tweets())?,
        Command::Post(args) => {
            emit(service.post_tweet(&caller()?, args.content.as_str(), args.username.as_str()))?
        }
        Command::Edit(args) => {
            emit(service.edit_tweet(&caller()?, &args.id, args.content.as_str()))?
        }
        Command::Delete(args) => emit(service.delete_tweet(&caller()?, &args.id))?,
        Command::Comment(args) => emit(service.add_comment(
            &caller()?,
            &args.tweet_id,
            args.content.as_str(),
            args.username.as_str(),
        ))?,
        Command::Uncomment(args) => {
            emit(service.delete_comment(&caller()?, &args.tweet_id, &args.comment_id))?
        }
        Command::Like(args) => emit(service.add_like(&caller()?, &args.id))?,
        Command::Unlike(args) => emit(service.remove_like(&caller()?, &args.id))?,
        Command::Retweet(args) => emit(service.retweet_tweet(
            &caller()?,
            &args.tweet_id,
            args.username.as_str(),
        ))?,
    };
    Ok(printed)
}

fn emit<T: Serialize>(result: ServiceResult<T>) -> anyhow::Result<bool> {
    let succeeded = result.is_ok();
    let envelope = Envelope::from(result);
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(succeeded)
}
