use acctcore::{
    account::Account,
    listing::ListingParams,
};
use acctctrl::{
    input::{
        AccountInput,
        BatchId,
    },
    platform::Builder as PlatformBuilder,
    Platform,
};
use clap::{
    Parser,
    Subcommand,
};
use std::{
    io::{
        stdin,
        stderr,
        Write,
    },
    process::ExitCode,
};

#[derive(Debug, Parser)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[clap(flatten)]
    platform_builder: PlatformBuilder,
    #[clap(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate a mail password hash once and report on its format
    Mailpw {
        /// Read from standard input when omitted
        password: Option<String>,
    },
    #[command(arg_required_else_help = true)]
    User {
        #[command(subcommand)]
        cmd: UserCmd,
    },
}

#[derive(Debug, Subcommand)]
enum UserCmd {
    #[command(arg_required_else_help = true)]
    Create {
        name: String,
        email: String,
        /// A random password is generated when omitted
        #[arg(long)]
        password: Option<String>,
    },
    #[command(arg_required_else_help = true)]
    Show {
        id: i64,
    },
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        sort: Option<String>,
        #[arg(long)]
        direction: Option<String>,
        #[arg(long)]
        page: Option<i64>,
        #[arg(long)]
        per_page: Option<i64>,
    },
    #[command(arg_required_else_help = true)]
    /// Sets the password, updating every stored form of it
    Password {
        id: i64,
        password: String,
    },
    #[command(arg_required_else_help = true)]
    /// Checks a password against the stored login hash
    Verify {
        id: i64,
        password: String,
    },
    #[command(arg_required_else_help = true)]
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let args = Cli::parse();
    stderrlog::new()
        .module(module_path!())
        .module("acctac")
        .module("acctctrl")
        .module("acctdb_sqlite")
        .verbosity((args.verbose as usize) + 1)
        .timestamp(stderrlog::Timestamp::Second)
        .init()?;

    match args.command {
        Commands::Mailpw { password } => {
            return mailpw(&args.platform_builder, password).await;
        }
        Commands::User { cmd } => {
            let platform = args.platform_builder
                .build()
                .await
                .map_err(anyhow::Error::from_boxed)?;
            parse_user(&platform, cmd).await?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

async fn mailpw(
    builder: &PlatformBuilder,
    password: Option<String>,
) -> anyhow::Result<ExitCode> {
    let password = match password {
        Some(password) => password,
        None => {
            eprint!("password to hash: ");
            stderr().flush()?;
            let mut line = String::new();
            stdin().read_line(&mut line)?;
            line.trim_end_matches(['\r', '\n']).to_string()
        }
    };
    if password.is_empty() {
        eprintln!("no password provided");
        return Ok(ExitCode::FAILURE);
    }

    let doveadm = builder.doveadm();
    println!("testing mail password hashing with scheme {}", builder.acct_doveadm_scheme);
    match doveadm.hash(&password).await {
        Ok(hash) => {
            println!("hash: {hash}");
            if doveadm.has_format_tag(&hash) {
                println!("hash carries the expected {} tag", doveadm.format_tag());
            } else {
                println!("warning: hash lacks the expected {} tag", doveadm.format_tag());
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("failed to generate mail password hash: {e}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn print_account(account: &Account) {
    println!("id: {}", account.id);
    println!("name: {}", account.name);
    println!("email: {}", account.email);
    println!("active: {}", account.active);
    println!("uid/gid: {}/{}", account.uid, account.gid);
    println!("home: {}", account.home.as_deref().unwrap_or("-"));
    println!(
        "emailpw: {}",
        if account.emailpw.is_some() { "set" } else { "missing" },
    );
    println!("created_at: {}", account.created_at.to_rfc3339());
    println!("updated_at: {}", account.updated_at.to_rfc3339());
}

async fn parse_user<'p>(
    platform: &'p Platform,
    arg: UserCmd,
) -> anyhow::Result<()> {
    match arg {
        UserCmd::Create { name, email, password } => {
            let mut input = AccountInput::new()
                .name(name)
                .email(email);
            input.password = password.map(Into::into);
            let account = platform.create_account(input).await?;
            println!("account {:?} created with id {}", account.email, account.id);
            if account.emailpw.is_none() {
                println!("warning: mail password hash could not be generated");
            }
        }
        UserCmd::Show { id } => {
            let account = platform.get_account(id).await?;
            print_account(&account);
        }
        UserCmd::List { search, sort, direction, page, per_page } => {
            let mut params = ListingParams::new();
            if let Some(search) = search {
                params = params.search(search);
            }
            if let Some(sort) = sort {
                params = params.sort(sort.as_str());
            }
            if let Some(direction) = direction {
                params = params.direction(direction.as_str());
            }
            if let Some(page) = page {
                params = params.page(page);
            }
            if let Some(per_page) = per_page {
                params = params.per_page(per_page);
            }
            let page = platform.list_accounts(&params).await?;
            for account in page.data.iter() {
                println!("{}\t{}\t{}", account.id, account.email, account.name);
            }
            println!(
                "page {} of {} ({} total)",
                page.current_page,
                page.last_page,
                page.total,
            );
        }
        UserCmd::Password { id, password } => {
            let account = platform.set_password(id, &password).await?;
            println!("updated password for account {}", account.email);
            if account.emailpw.is_none() {
                println!("warning: mail password hash could not be generated");
            }
        }
        UserCmd::Verify { id, password } => {
            match platform.verify_password(id, &password).await {
                Ok(()) => println!("password verified for account id {id}"),
                Err(e) => println!("password not verified for account id {id}: {e}"),
            }
        }
        UserCmd::Delete { ids } => {
            let ids = ids.into_iter()
                .map(BatchId::Text)
                .collect::<Vec<_>>();
            let report = platform.batch_delete(&ids).await;
            println!("{}", report.message);
            for error in report.errors.iter() {
                println!("{error}");
            }
        }
    }
    Ok(())
}
