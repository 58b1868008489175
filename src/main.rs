use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use image::ImageFormat;

use rgba_composer::composer::output::formats::format_name;
use rgba_composer::composer::output::{
    input_filename_filter, output_filename_filter, parse_output_format, supported_input_formats,
    supported_output_formats,
};
use rgba_composer::composer::{
    FixedSize, InputSource, OutputChannel, OutputConfig, RgbaComposer, SaveOutcome, Size, SizeQuery,
    SourceChannel, TerminalSizePrompt, TiffCompression,
};
use rgba_composer::logger;
use rgba_composer::settings::{JsonFileStore, RememberedSize, Settings};

use tracing::{error, info, warn};

/// Compose an RGBA image from constants and channels of other images.
#[derive(Parser, Debug)]
#[command(name = "rgba-composer", version, about, long_about = None)]
struct Cli {
    /// Settings file holding the channel configuration.
    #[arg(long, global = true, env = "RGBA_COMPOSER_SETTINGS", default_value = "rgba-composer.json")]
    settings: PathBuf,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the configuration of all four output channels.
    Show,
    /// Configure one output channel.
    Set(SetArgs),
    /// Compose the image and save it.
    Compose(ComposeArgs),
    /// List the image formats that can be read and written.
    Formats,
}

#[derive(Parser, Debug)]
struct SetArgs {
    /// Output channel: r, g, b or a.
    channel: OutputChannel,

    #[command(subcommand)]
    source: SourceCommand,
}

#[derive(Subcommand, Debug)]
enum SourceCommand {
    /// Fill the channel with a fixed value.
    Constant {
        /// Value in [0, 255].
        value: u8,
    },
    /// Take the channel from a channel of an input image.
    Image {
        /// Input image file.
        file: PathBuf,

        /// Channel of the input image to extract (red, green, blue, alpha).
        #[arg(long, value_name = "CHANNEL")]
        source: Option<SourceChannel>,

        /// Invert the extracted values.
        #[arg(long, conflicts_with = "no_invert")]
        invert: bool,

        /// Do not invert the extracted values.
        #[arg(long)]
        no_invert: bool,
    },
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Output image path.
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Output format (png, tif, jpg, ...). Defaults to the output extension,
    /// then to the last format used.
    #[arg(short, long, value_name = "FORMAT")]
    format: Option<String>,

    /// Output size as WIDTHxHEIGHT when every channel is constant.
    /// Without it the size is asked for interactively.
    #[arg(long, value_name = "WxH")]
    size: Option<Size>,

    /// TIFF compression: none, lzw, deflate-fast, deflate, deflate-best.
    #[arg(long, default_value = "lzw", value_name = "MODE")]
    tiff_compression: TiffCompression,

    /// Largest accepted output width or height.
    #[arg(long, value_name = "PIXELS")]
    max_dimension: Option<u32>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    if let Err(err) = run(&cli) {
        error!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.cmd {
        Command::Show => show(cli),
        Command::Set(args) => set(cli, args),
        Command::Compose(args) => compose(cli, args),
        Command::Formats => {
            formats();
            Ok(())
        }
    }
}

fn open_settings(cli: &Cli) -> Result<Settings<JsonFileStore>> {
    let store = JsonFileStore::open(&cli.settings)
        .with_context(|| format!("Failed to open settings {}", cli.settings.display()))?;
    Ok(Settings::new(store))
}

fn show(cli: &Cli) -> Result<()> {
    let settings = open_settings(cli)?;
    for channel in OutputChannel::ALL {
        println!("{channel}  {}", settings.channel_config(channel));
    }
    println!("output size    {}", settings.output_size());
    println!("output format  {:?}", settings.output_format());
    Ok(())
}

fn set(cli: &Cli, args: &SetArgs) -> Result<()> {
    let mut settings = open_settings(cli)?;
    let channel = args.channel;

    match &args.source {
        SourceCommand::Constant { value } => {
            settings.set_input_source(channel, InputSource::Constant);
            settings.set_input_constant(channel, *value);
        }
        SourceCommand::Image { file, source, invert, no_invert } => {
            let file = std::path::absolute(file)
                .with_context(|| format!("Invalid input path {}", file.display()))?;
            settings.set_input_source(channel, InputSource::Image);
            settings.set_input_image_filename(channel, Some(file));
            if let Some(source) = source {
                settings.set_input_channel(channel, *source);
            }
            if *invert || *no_invert {
                settings.set_input_image_invert(channel, *invert);
            }
        }
    }

    settings.flush().context("Failed to save settings")?;
    info!("{channel}: {}", settings.channel_config(channel));
    Ok(())
}

fn compose(cli: &Cli, args: &ComposeArgs) -> Result<()> {
    let mut settings = open_settings(cli)?;

    let explicit_format = args
        .format
        .as_deref()
        .map(parse_output_format)
        .transpose()
        .context("Invalid output format")?;

    let mut builder = OutputConfig::builder()
        .format(explicit_format)
        .compression(args.tiff_compression);
    if args.max_dimension.is_some() {
        builder = builder.max_dimension(args.max_dimension);
    }
    let composer = RgbaComposer::new(builder.build());

    let channels = settings.channel_configs();
    let initial_size = settings.output_size();
    let remembered_format = settings.output_format();

    let saved = {
        let inner: Box<dyn SizeQuery> = match args.size {
            Some(size) => Box::new(FixedSize(size)),
            None => {
                if !std::io::stdin().is_terminal() {
                    info!("Reading output size from standard input");
                }
                Box::new(TerminalSizePrompt::new(std::io::stdin().lock(), std::io::stderr()))
            }
        };
        let mut query = RememberedSize::new(&mut settings, inner);
        composer.save(&channels, initial_size, &mut query, &args.output, remembered_format)
    };

    // An accepted size is kept even when the save itself fails.
    let outcome = match saved {
        Ok(outcome) => outcome,
        Err(err) => {
            if let Err(flush_err) = settings.flush() {
                warn!("Failed to save settings: {flush_err}");
            }
            return Err(err.into());
        }
    };

    if let SaveOutcome::Saved { size, format } = outcome {
        settings.set_output_format(format);
        println!(
            "Saved {} {} image to {}",
            size,
            format_name(format),
            args.output.display()
        );
    }
    settings.flush().context("Failed to save settings")?;

    Ok(())
}

fn formats() {
    let names = |formats: Vec<ImageFormat>| {
        formats
            .into_iter()
            .map(format_name)
            .collect::<Vec<_>>()
            .join(" ")
    };

    println!("readable: {}", names(supported_input_formats()));
    println!("writable: {}", names(supported_output_formats()));
    println!();
    println!("open filter: {}", input_filename_filter());
    println!("save filter: {}", output_filename_filter());
}
