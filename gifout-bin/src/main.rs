// main.rs      gifout command
//
// Copyright (c) 2026  Douglas Lau
//
#![forbid(unsafe_code)]

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use gifout::{GifEncoder, ImageDescriptor, OpenMode, SampleFormat, Session};
use std::error::Error;
use std::fs;
use std::io::Write;
use std::str::FromStr;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Crate version
const VERSION: &str = std::env!("CARGO_PKG_VERSION");

/// Features to report in `caps`
const FEATURES: &[&str] = &[
    "alpha",
    "random_access",
    "multiimage",
    "appendsubimage",
    "ioproxy",
    "tiles",
    "mipmap",
    "volumes",
];

/// Main entry point
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::builder().format_timestamp(None).init();
    let mut out = StandardStream::stdout(ColorChoice::Auto);
    match create_app().get_matches().subcommand() {
        ("wrap", Some(matches)) => wrap(&mut out, matches)?,
        ("caps", Some(_matches)) => caps(&mut out)?,
        _ => unreachable!(),
    }
    out.reset()?;
    Ok(())
}

/// Create clap App
fn create_app() -> App<'static, 'static> {
    App::new("gifout")
        .version(VERSION)
        .setting(AppSettings::GlobalVersion)
        .about("Animated GIF writer")
        .setting(AppSettings::ArgRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("wrap")
                .about("Wrap raw frames into a GIF")
                .arg(
                    Arg::with_name("width")
                        .long("width")
                        .takes_value(true)
                        .required(true)
                        .help("frame width"),
                )
                .arg(
                    Arg::with_name("height")
                        .long("height")
                        .takes_value(true)
                        .required(true)
                        .help("frame height"),
                )
                .arg(
                    Arg::with_name("channels")
                        .long("channels")
                        .takes_value(true)
                        .possible_values(&["3", "4"])
                        .default_value("4")
                        .help("channels per pixel"),
                )
                .arg(
                    Arg::with_name("sample")
                        .long("sample")
                        .takes_value(true)
                        .possible_values(&["u8", "u16", "f32"])
                        .default_value("u8")
                        .help("sample format (native endian)"),
                )
                .arg(
                    Arg::with_name("fps")
                        .long("fps")
                        .takes_value(true)
                        .default_value("1")
                        .help("frames per second"),
                )
                .arg(
                    Arg::with_name("no-dither")
                        .long("no-dither")
                        .help("disable dithering"),
                )
                .arg(
                    Arg::with_name("output")
                        .short("o")
                        .long("output")
                        .takes_value(true)
                        .required(true)
                        .help("output GIF file"),
                )
                .arg(
                    Arg::with_name("frames")
                        .required(true)
                        .min_values(1)
                        .help("raw frame file(s)"),
                ),
        )
        .subcommand(
            SubCommand::with_name("caps").about("Show supported features"),
        )
}

/// Parse a required argument
fn parse<T>(matches: &ArgMatches, name: &str) -> Result<T, Box<dyn Error>>
where
    T: FromStr,
    T::Err: Error + 'static,
{
    let value = matches
        .value_of(name)
        .ok_or_else(|| format!("missing {name}"))?;
    Ok(value.parse()?)
}

/// Parse a sample format name
fn sample_format(name: &str) -> Result<SampleFormat, Box<dyn Error>> {
    match name {
        "u8" => Ok(SampleFormat::U8),
        "u16" => Ok(SampleFormat::U16),
        "f32" => Ok(SampleFormat::F32),
        _ => Err(format!("unknown sample format: {name}").into()),
    }
}

/// Handle wrap subcommand
fn wrap(
    out: &mut StandardStream,
    matches: &ArgMatches,
) -> Result<(), Box<dyn Error>> {
    let width: u32 = parse(matches, "width")?;
    let height: u32 = parse(matches, "height")?;
    let channels: u8 = parse(matches, "channels")?;
    let fps: f32 = parse(matches, "fps")?;
    let format = sample_format(matches.value_of("sample").unwrap_or("u8"))?;
    let output = matches.value_of("output").ok_or("missing output")?;
    let paths: Vec<&str> = matches
        .values_of("frames")
        .ok_or("missing frames")?
        .collect();
    let desc = ImageDescriptor::new(width, height, channels)
        .with_frames_per_second(fps);
    let descs = vec![desc.clone(); paths.len()];
    let mut session =
        Session::new().with_dither(!matches.is_present("no-dither"));
    session.open(output, &descs)?;
    let delay = session.delay_cs();
    for (i, path) in paths.iter().enumerate() {
        if i > 0 {
            session.open_with_mode(output, &desc, OpenMode::AppendSubimage)?;
        }
        let data = fs::read(path)?;
        session.write_image(format, &data, None, None)?;
    }
    session.close()?;
    summary(out, output, paths.len(), width, height, delay)
}

/// Print a summary of a written GIF
fn summary(
    out: &mut StandardStream,
    output: &str,
    frames: usize,
    width: u32,
    height: u32,
    delay: u16,
) -> Result<(), Box<dyn Error>> {
    let mut magenta = ColorSpec::new();
    magenta.set_fg(Some(Color::Magenta));
    let mut bold = ColorSpec::new();
    bold.set_fg(Some(Color::White))
        .set_intense(true)
        .set_bold(true);
    out.set_color(&magenta)?;
    writeln!(out, "{output:?}")?;
    out.set_color(&bold)?;
    writeln!(
        out,
        "frames: {frames}, size: {width}x{height}, delay: {delay} cs"
    )?;
    Ok(())
}

/// Handle caps subcommand
fn caps(out: &mut StandardStream) -> Result<(), Box<dyn Error>> {
    let session = Session::<GifEncoder>::new();
    let mut green = ColorSpec::new();
    green.set_fg(Some(Color::Green)).set_intense(true);
    let mut red = ColorSpec::new();
    red.set_fg(Some(Color::Red)).set_intense(true);
    out.reset()?;
    writeln!(
        out,
        "{} ({})",
        session.format_name(),
        session.extensions().join(", ")
    )?;
    for feature in FEATURES {
        if session.supports(feature) {
            out.set_color(&green)?;
            writeln!(out, "  + {feature}")?;
        } else {
            out.set_color(&red)?;
            writeln!(out, "  - {feature}")?;
        }
    }
    Ok(())
}
