//! Wires a small application through the container, then swaps the mailer
//! for a recording mock the way a test harness would.
//!
//! Run with `RUST_LOG=ferrous_ioc=trace cargo run --example service_wiring`.

use ferrous_ioc::{contract, Container, ContainerOptions, DiResult, Resolver, TracingObserver};
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

pub struct Config {
    smtp_host: String,
    sender: String,
}

pub trait Mailer: Send + Sync {
    fn send(&self, to: &str, body: &str) -> String;
}

struct SmtpMailer {
    host: String,
    sender: String,
}

impl Mailer for SmtpMailer {
    fn send(&self, to: &str, body: &str) -> String {
        format!("smtp://{} {} -> {}: {}", self.host, self.sender, to, body)
    }
}

struct RecordingMailer {
    sent: Mutex<Vec<String>>,
}

impl Mailer for RecordingMailer {
    fn send(&self, to: &str, body: &str) -> String {
        let line = format!("recorded {}: {}", to, body);
        self.sent.lock().unwrap().push(line.clone());
        line
    }
}

pub struct Signup {
    mailer: Arc<dyn Mailer>,
}

impl Signup {
    fn register(&self, email: &str) -> String {
        self.mailer.send(email, "welcome aboard")
    }
}

contract! {
    pub App {
        ConfigService => "Core/Config": Config,
        MailerService => "Service/Mailer": dyn Mailer,
        SignupService => "Service/Signup": Signup,
    }
}

fn build_container() -> DiResult<Container<App>> {
    let ioc = Container::<App>::builder()
        .options(ContainerOptions::from_env())
        .add_observer(Arc::new(TracingObserver::with_label("demo")))
        .build();

    ioc.register_singleton(ConfigService, |_| Config {
        smtp_host: "mail.example.com".to_string(),
        sender: "noreply@example.com".to_string(),
    });

    ioc.try_register(MailerService, |c| {
        let config = c.get(ConfigService)?;
        Ok(Arc::new(SmtpMailer {
            host: config.smtp_host.clone(),
            sender: config.sender.clone(),
        }) as Arc<dyn Mailer>)
    })
    .try_register(SignupService, |c| Ok(Signup { mailer: c.get(MailerService)? }));

    let missing = ioc.missing_namespaces();
    if !missing.is_empty() {
        tracing::warn!(?missing, "unbound namespaces");
    }

    Ok(ioc)
}

fn main() -> DiResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let ioc = build_container()?;
    println!("{}", ioc.get(SignupService)?.register("ada@example.com"));

    let recording = Arc::new(RecordingMailer { sent: Mutex::new(Vec::new()) });
    let mock = recording.clone();
    ioc.mock(MailerService, move |_, _original| mock.clone() as Arc<dyn Mailer>)
        .enable_mocks();

    println!("{}", ioc.get(SignupService)?.register("grace@example.com"));
    println!("captured: {:?}", recording.sent.lock().unwrap());

    ioc.disable_mocks();
    println!("{}", ioc.get(SignupService)?.register("alan@example.com"));

    Ok(())
}
