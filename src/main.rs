use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use std::io::Write;
use std::path::{Path, PathBuf};

use feedgen::config::Config;
use feedgen::ext::dc::DublinCore;
use feedgen::ext::podcast::{EpisodeType, Owner, PodcastEntry, PodcastFeed, ShowType};
use feedgen::ext::syndication::{Syndication, UpdatePeriod};
use feedgen::ext::torrent::Torrent;
use feedgen::{Category, Entry, Feed, Format, Link, Person, Rel, RenderOptions, TextType};

const TARGETS: &str = "\
Targets:
  <file>.atom        Write the sample feed to a file as Atom
  <file>.rss         Write the sample feed to a file as RSS
  atom               Print the sample feed as Atom
  rss                Print the sample feed as RSS
  podcast            Print the sample feed with the podcast extension
  torrent            Print the sample feed with the torrent extension
  dc.atom | dc.rss   Print the sample feed with Dublin Core metadata
  syndication.atom | syndication.rss
                     Print the sample feed with syndication hints";

#[derive(Parser, Debug)]
#[command(
    name = "feedgen",
    version,
    about = "Generate sample RSS 2.0 and Atom 1.0 feeds",
    after_help = TARGETS
)]
struct Args {
    /// What to generate
    target: Option<String>,

    /// Render options file (TOML, `[render]` table)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Do not indent output written to stdout
    #[arg(long)]
    compact: bool,
}

/// A parsed command-line target.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    Print(Format),
    Podcast,
    Torrent,
    DublinCore(Format),
    Syndication(Format),
    File(PathBuf, Format),
}

impl Target {
    fn parse(arg: &str) -> Option<Self> {
        let target = match arg {
            "atom" => Target::Print(Format::Atom),
            "rss" => Target::Print(Format::Rss),
            "podcast" => Target::Podcast,
            "torrent" => Target::Torrent,
            "dc.atom" => Target::DublinCore(Format::Atom),
            "dc.rss" => Target::DublinCore(Format::Rss),
            "syndication.atom" => Target::Syndication(Format::Atom),
            "syndication.rss" => Target::Syndication(Format::Rss),
            path if path.ends_with(".atom") => Target::File(PathBuf::from(path), Format::Atom),
            path if path.ends_with(".rss") => Target::File(PathBuf::from(path), Format::Rss),
            _ => return None,
        };
        Some(target)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let Some(target) = args.target.as_deref().and_then(Target::parse) else {
        if let Some(unknown) = &args.target {
            tracing::debug!(arg = %unknown, "Unrecognised target");
        }
        Args::command().print_help()?;
        return Ok(());
    };

    let config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config '{}'", path.display()))?,
        None => Config::default(),
    };
    let mut options = config.render;

    let mut feed = sample_feed()?;
    let format = match &target {
        Target::File(path, format) => {
            return write_file(&feed, *format, path, &options);
        }
        Target::Print(format) => *format,
        Target::Podcast => {
            add_podcast(&mut feed)?;
            Format::Rss
        }
        Target::Torrent => {
            add_torrent(&mut feed)?;
            Format::Rss
        }
        Target::DublinCore(format) => {
            feed.load_extension("dc")?;
            feed.extension_mut::<DublinCore>("dc")
                .context("dc extension not attached")?
                .contributor
                .push("John Doe".to_string());
            *format
        }
        Target::Syndication(format) => {
            feed.load_extension("syndication")?;
            let sy = feed
                .extension_mut::<Syndication>("syndication")
                .context("syndication extension not attached")?;
            sy.update_period = Some(UpdatePeriod::Daily);
            sy.set_update_frequency(2)?;
            sy.set_update_base("2000-01-01T12:00+00:00")?;
            *format
        }
    };

    options.pretty = !args.compact;
    let bytes = feedgen::render(&feed, format, &options)
        .with_context(|| format!("Failed to render {format} feed"))?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&bytes)?;
    stdout.flush()?;
    Ok(())
}

fn write_file(feed: &Feed, format: Format, path: &Path, options: &RenderOptions) -> Result<()> {
    feedgen::render_to_file(feed, format, path, options)
        .with_context(|| format!("Failed to write '{}'", path.display()))?;
    eprintln!("Wrote {} feed to {}", format, path.display());
    Ok(())
}

// ============================================================================
// Sample feed
// ============================================================================

fn sample_feed() -> Result<Feed> {
    let mut feed = Feed::new();
    feed.set_id("https://example.com/feed.xml")
        .set_title("A Feed")
        .add_author(Person::new("John Doe").with_email("jdoe@example.com"))
        .add_link(Link::new("https://example.com").with_rel(Rel::Alternate))
        .add_category(Category::new("test"))
        .add_contributor(Person::new("John Doe").with_email("jdoe@example.com"))
        .add_contributor(Person::new("Jane Doe").with_email("jdoe@example.net"))
        .set_icon("https://example.com/icon.jpg")
        .set_logo("https://example.com/logo.jpg")
        .set_rights("cc-by")
        .set_subtitle("This is a cool feed!")
        .add_link(Link::new("https://example.com/feed.xml").with_rel(Rel::SelfLink))
        .set_language("de");

    let entry = feed.add_entry();
    entry
        .set_id("https://example.com/entry")
        .set_title("First Element")
        .set_content(
            "Lorem ipsum dolor sit amet, consectetur adipiscing elit. Tamen \
             aberramus a proposito, et, ne longius, prorsus, inquam, Piso, si ista \
             mala sunt, placet. Aut etiam, ut vestitum, sic sententiam habeas aliam \
             domesticam, aliam forensem, ut in fronte ostentatio sit, intus veritas \
             occultetur? Cum id fugiunt, re eadem defendunt, quae Peripatetici, verba.",
            TextType::Text,
        )?
        .set_summary(
            "Lorem ipsum dolor sit amet, consectetur adipiscing elit…",
            TextType::Text,
        )?
        .add_link(Link::new("https://example.com/entry").with_rel(Rel::Alternate))
        .add_author(Person::new("John Doe").with_email("jdoe@example.com"));
    Ok(feed)
}

fn first_entry(feed: &mut Feed) -> Result<&mut Entry> {
    feed.entry_mut(0).context("sample feed has no entries")
}

fn add_podcast(feed: &mut Feed) -> Result<()> {
    // Attaches to the sample entry as well
    feed.load_extension("podcast")?;

    let show = feed
        .extension_mut::<PodcastFeed>("podcast")
        .context("podcast extension not attached")?;
    show.author = Some("John Doe".to_string());
    show.add_category("Technology", Some("Podcasting"));
    show.explicit = Some(false);
    show.complete = Some(false);
    show.new_feed_url = Some("https://example.com/new-feed.rss".to_string());
    show.owner = Some(Owner {
        name: "John Doe".to_string(),
        email: "jdoe@example.com".to_string(),
    });
    show.summary = Some(
        "Lorem ipsum dolor sit amet, consectetur adipiscing elit. Verba tu \
         fingas et ea dicas, quae non sentias?"
            .to_string(),
    );
    show.show_type = Some(ShowType::Episodic);

    let episode = first_entry(feed)?
        .extension_mut::<PodcastEntry>("podcast")
        .context("podcast extension not attached to entry")?;
    episode.author = Some("John Doe".to_string());
    episode.season = Some(1);
    episode.episode = Some(1);
    episode.title = Some("First podcast episode".to_string());
    episode.episode_type = Some(EpisodeType::Full);
    Ok(())
}

fn add_torrent(feed: &mut Feed) -> Result<()> {
    feed.load_extension("torrent")?;

    let entry = first_entry(feed)?;
    entry.add_link(
        Link::new("https://example.com/torrent/debian-8-netint.iso.torrent")
            .with_rel(Rel::Alternate)
            .with_type("application/x-bittorrent")
            .with_length(1000),
    );
    let torrent = entry
        .extension_mut::<Torrent>("torrent")
        .context("torrent extension not attached to entry")?;
    torrent.filename = Some("debian-8.4.0-i386-netint.iso.torrent".to_string());
    torrent.infohash = Some("7661229811ef32014879ceedcdf4a48f256c88ba".to_string());
    torrent.content_length = Some(331_350_016);
    torrent.seeds = Some(789);
    torrent.peers = Some(456);
    torrent.verified = Some(123);
    Ok(())
}
