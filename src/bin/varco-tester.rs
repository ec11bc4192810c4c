//! Terminal front end for a running relay.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use varco_tts_tester::catalog::CatalogView;
use varco_tts_tester::client::{ClientError, RelayClient, Session};
use varco_tts_tester::relay::Mode;

#[derive(Parser, Debug)]
#[command(name = "varco-tester", version, about = "Browse voices and synthesize through the relay")]
struct Cli {
    /// Relay base URL
    #[arg(long, env = "VARCO_RELAY_URL", default_value = "http://127.0.0.1:5178")]
    relay: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the catalog through the filter engine
    Voices {
        /// Force the relay to re-read its catalog file
        #[arg(long)]
        reload: bool,

        #[command(flatten)]
        filter: FilterArgs,

        /// Show details for this voice uuid
        #[arg(long)]
        select: Option<String>,
    },
    /// Synthesize text and save the returned audio
    Synthesize(SynthesizeArgs),
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Case-insensitive free-text search
    #[arg(long, short = 'q', default_value = "")]
    query: String,
    #[arg(long, default_value = "")]
    emotion: String,
    #[arg(long, default_value = "")]
    gender: String,
    /// Filter on saas_name
    #[arg(long, default_value = "")]
    actor: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Lite,
    Standard,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Lite => Mode::Lite,
            ModeArg::Standard => Mode::Standard,
        }
    }
}

#[derive(Args, Debug)]
struct SynthesizeArgs {
    #[arg(long, env = "OPENAPI_KEY", hide_env_values = true)]
    api_key: String,

    #[arg(long, value_enum, default_value = "lite")]
    mode: ModeArg,

    #[arg(long)]
    text: String,

    #[arg(long, default_value = "korean")]
    language: String,

    /// Voice uuid (or any raw voice string)
    #[arg(long, conflicts_with = "first")]
    voice: Option<String>,

    /// Use the first voice matching the filters
    #[arg(long)]
    first: bool,

    #[command(flatten)]
    filter: FilterArgs,

    #[arg(long, default_value = "")]
    speed: String,
    #[arg(long, default_value = "")]
    pitch: String,
    /// Standard mode only
    #[arg(long, default_value = "")]
    n_fm_steps: String,
    /// Standard mode only
    #[arg(long, default_value = "")]
    seed: String,

    #[arg(long)]
    return_metadata: bool,

    /// Where to write the audio
    #[arg(long, short = 'o', default_value = "output.wav")]
    out: PathBuf,

    /// Play the audio after saving it
    #[cfg(feature = "audio-playback")]
    #[arg(long)]
    play: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let relay = RelayClient::new(cli.relay);
    let mut session = Session::new();

    let result = match cli.command {
        Command::Voices {
            reload,
            filter,
            select,
        } => list_voices(&mut session, &relay, reload, &filter, select.as_deref()).await,
        Command::Synthesize(args) => synthesize(&mut session, &relay, args).await,
    };

    for line in session.log.lines() {
        eprintln!("{}", line);
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.output());
            ExitCode::FAILURE
        }
    }
}

fn apply_filters(session: &mut Session, filter: &FilterArgs) {
    session.set_query(&filter.query);
    session.set_emotion(&filter.emotion);
    session.set_gender(&filter.gender);
    session.set_actor(&filter.actor);
}

async fn list_voices(
    session: &mut Session,
    relay: &RelayClient,
    reload: bool,
    filter: &FilterArgs,
    select: Option<&str>,
) -> Result<(), ClientError> {
    session.load_voices(relay, reload).await?;
    apply_filters(session, filter);
    if let Some(uuid) = select {
        session.select_voice(uuid);
    }

    print_view(&session.view());
    Ok(())
}

fn print_view(view: &CatalogView) {
    println!("{}", view.count_line);
    for select in [&view.emotion, &view.gender, &view.actor] {
        println!("{} {}", select.placeholder, select.options.join(", "));
    }
    println!();

    for option in &view.voices {
        let marker = if option.value == view.selected { "*" } else { " " };
        println!("{} {:<40} {}", marker, option.value, option.label);
    }

    if let Some(detail) = &view.detail {
        println!();
        println!("{}", detail.title);
        println!("  {}", detail.subtitle);
        if let Some(description) = &detail.description {
            println!("  {}", description);
        }
        if !detail.tags.is_empty() {
            println!("  [{}]", detail.tags.join("] ["));
        }
    }
}

async fn synthesize(
    session: &mut Session,
    relay: &RelayClient,
    args: SynthesizeArgs,
) -> Result<(), ClientError> {
    if args.first {
        session.load_voices(relay, false).await?;
        apply_filters(session, &args.filter);
        if session.use_first_voice().is_none() {
            return Err(ClientError::Validation("no voices to select".into()));
        }
    } else if let Some(voice) = &args.voice {
        session.form.voice = voice.clone();
    }

    session.set_mode(args.mode.into());
    session.form.api_key = args.api_key;
    session.form.text = args.text;
    session.form.language = args.language;
    session.form.speed = args.speed;
    session.form.pitch = args.pitch;
    session.form.n_fm_steps = args.n_fm_steps;
    session.form.seed = args.seed;
    session.form.return_metadata = args.return_metadata;

    let has_audio = session.synthesize(relay).await?;
    println!("{}", session.synth_output);

    let Some(clip) = session.audio.current().filter(|_| has_audio) else {
        return Ok(());
    };

    clip.save(&args.out)?;
    match clip.wav() {
        Some(info) => eprintln!(
            "saved {} ({} Hz, {} ch, {:.2}s)",
            args.out.display(),
            info.sample_rate,
            info.channels,
            info.duration_secs
        ),
        None => eprintln!("saved {} ({} bytes)", args.out.display(), clip.bytes().len()),
    }

    #[cfg(feature = "audio-playback")]
    if args.play {
        clip.play()?;
    }

    Ok(())
}
