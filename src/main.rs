use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result, miette};
use targetpay::application::lifecycle::Payment;
use targetpay::application::pull::StatusCheck;
use targetpay::domain::method::PaymentMethod;
use targetpay::domain::params;
use targetpay::infrastructure::http::FreshConnectionTransport;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start a payment transaction and print the redirect URL
    Start {
        /// Payment method name or alias (ideal, mrcash, directebanking, paysafecard)
        #[arg(long)]
        method: String,

        /// Sub-account layout code (rtlo)
        #[arg(long)]
        rtlo: String,

        /// Amount in cents
        #[arg(long)]
        amount: String,

        /// Payment description (max 32 characters after normalization)
        #[arg(long)]
        description: String,

        /// URL the client returns to after the payment
        #[arg(long)]
        return_url: String,

        /// URL that receives status push notifications
        #[arg(long)]
        report_url: Option<String>,

        /// ISO 4217 currency code
        #[arg(long)]
        currency: Option<String>,

        /// ISO 639 language code
        #[arg(long)]
        language: Option<String>,

        /// Client IP address to report to the gateway
        #[arg(long)]
        client_ip: Option<String>,

        /// Issuing bank id (iDEAL only)
        #[arg(long)]
        issuer: Option<String>,

        /// ISO 3166-1 country code (SOFORT Banking only)
        #[arg(long)]
        country: Option<String>,
    },

    /// Print the current iDEAL issuer list
    Issuers {
        /// Sub-account layout code (rtlo)
        #[arg(long)]
        rtlo: String,

        /// Print the list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check the status of a transaction
    Check {
        /// Payment method name or alias
        #[arg(long)]
        method: String,

        /// Sub-account layout code (rtlo)
        #[arg(long)]
        rtlo: String,

        /// Transaction identifier (trxid)
        #[arg(long)]
        trxid: Option<String>,

        /// Allow the transaction to be checked more than once
        #[arg(long)]
        again: bool,

        /// Run against the gateway's test mode
        #[arg(long)]
        test: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    match Cli::parse().command {
        Command::Start {
            method,
            rtlo,
            amount,
            description,
            return_url,
            report_url,
            currency,
            language,
            client_ip,
            issuer,
            country,
        } => {
            let method = PaymentMethod::from_alias(&method).into_diagnostic()?;
            let amount = params::parse_amount(&amount).into_diagnostic()?;
            let mut payment =
                Payment::from_layout_code(method, &rtlo, Box::new(FreshConnectionTransport::new()))
                    .into_diagnostic()?;

            payment.request_mut().set_amount(amount).into_diagnostic()?;
            payment
                .request_mut()
                .set_description(&description)
                .into_diagnostic()?;
            payment
                .request_mut()
                .set_return_url(&return_url)
                .into_diagnostic()?;
            if let Some(report_url) = report_url {
                payment
                    .request_mut()
                    .set_report_url(&report_url)
                    .into_diagnostic()?;
            }
            if let Some(currency) = currency {
                payment.request_mut().set_currency(&currency);
            }
            if let Some(language) = language {
                payment.request_mut().set_language(&language);
            }
            if let Some(client_ip) = client_ip {
                payment
                    .request_mut()
                    .set_client_ip(&client_ip)
                    .into_diagnostic()?;
            }
            if let Some(country) = country {
                payment.request_mut().set_country(&country).into_diagnostic()?;
            }
            if let Some(issuer) = issuer {
                payment.set_issuer(&issuer).await.into_diagnostic()?;
            }

            if payment.start().await.into_diagnostic()? {
                let result = payment
                    .result()
                    .ok_or_else(|| miette!("started without a result"))?;
                println!("trxid: {}", result.transaction_id);
                println!("redirect: {}", result.redirect_url);
                Ok(())
            } else {
                Err(miette!(
                    "transaction not started: {}",
                    payment.response().unwrap_or("no response")
                ))
            }
        }

        Command::Issuers { rtlo, json } => {
            let mut payment = Payment::from_layout_code(
                PaymentMethod::Ideal,
                &rtlo,
                Box::new(FreshConnectionTransport::new()),
            )
            .into_diagnostic()?;
            let issuers = payment.issuers().await.into_diagnostic()?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&issuers).into_diagnostic()?
                );
            } else {
                for issuer in issuers {
                    println!("{}\t{}", issuer.id, issuer.name);
                }
            }
            Ok(())
        }

        Command::Check {
            method,
            rtlo,
            trxid,
            again,
            test,
        } => {
            let mut check = StatusCheck::for_method_name(&method, &rtlo).into_diagnostic()?;
            if let Some(trxid) = trxid {
                check.set_transaction_id(trxid);
            }
            check.set_once(!again);
            check.set_test(test);

            let transport = FreshConnectionTransport::new();
            let reached = check.validate(&transport).await;
            println!("{}", check.response().unwrap_or(""));
            if reached {
                Ok(())
            } else {
                Err(miette!("check request failed in transport"))
            }
        }
    }
}
