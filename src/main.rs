use anyhow::{bail, Context};
use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use snooze_clock::{
    alarm::AlarmId,
    audio::{AlarmSound, RodioAlarmSound, SilentAlarmSound},
    config::Settings,
    edit::EditController,
    gui,
    persistence::TomlAlarmFile,
    store::AlarmStore,
    time_source::{ClockSetter, DateCommand, SystemTimeSource},
    Capabilities, Clock,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// write the default config file
    Init {
        #[clap(long, short)]
        force: bool,
    },
    /// print every alarm
    List,
    /// set an alarm from a 12 hour reading, e.g. `set-alarm 2 7 30 am`
    SetAlarm {
        id: u8,
        hour: String,
        minute: String,
        meridiem: String,
        #[clap(long, short, default_value = "0")]
        second: String,
    },
    /// turn an alarm on or off
    Toggle { id: u8 },
    /// set the system time, HH:MM:SS
    SetTime { time: String },
    /// set the system date, YYYY-MM-DD
    SetDate { date: String },
}

fn main() -> anyhow::Result<()> {
    simple_file_logger::init_logger!("snooze_clock")
        .map_err(|e| anyhow::anyhow!("couldn't initialize logger: {e}"))?;

    let args = Args::parse();
    let settings = Settings::load(Settings::config_path());

    match args.command {
        Some(Command::Init { force }) => {
            if force || !Settings::is_config_present() {
                Settings::new()
                    .save(Settings::config_path())
                    .context("couldn't write config")?;
                std::fs::create_dir_all(Settings::sounds_path())
                    .context("couldn't create the sounds directory")?;
                println!("wrote {}", Settings::config_path().display());
            } else {
                println!(
                    "{} already exists, use --force to overwrite it",
                    Settings::config_path().display()
                );
            }
        }
        Some(Command::List) => {
            for alarm in open_store(&settings)?.alarms() {
                println!("{alarm}");
            }
        }
        Some(Command::SetAlarm {
            id,
            hour,
            minute,
            second,
            meridiem,
        }) => {
            let mut store = open_store(&settings)?;
            EditController::new(&mut store)
                .set_alarm_time_from_text(AlarmId(id), &hour, &minute, &second, &meridiem)?;
            println!("{}", store.get(AlarmId(id))?);
        }
        Some(Command::Toggle { id }) => {
            let mut store = open_store(&settings)?;
            EditController::new(&mut store).toggle_active(AlarmId(id))?;
            println!("{}", store.get(AlarmId(id))?);
        }
        Some(Command::SetTime { time }) => {
            let time = NaiveTime::parse_from_str(&time, "%H:%M:%S")
                .with_context(|| format!("{time} is not HH:MM:SS"))?;
            DateCommand::default().set_time(&SystemTimeSource, time)?;
        }
        Some(Command::SetDate { date }) => {
            let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                .with_context(|| format!("{date} is not YYYY-MM-DD"))?;
            DateCommand::default().set_date(&SystemTimeSource, date)?;
        }
        None => {
            let sound: Box<dyn AlarmSound> = match RodioAlarmSound::new(settings.sound_path()) {
                Ok(sound) => Box::new(sound),
                Err(e) => {
                    log::warn!("alarms will be silent: {e}");
                    Box::<SilentAlarmSound>::default()
                }
            };
            let clock = Clock::new(
                settings.alarm_count,
                Box::new(SystemTimeSource),
                Capabilities::from_settings(&settings, sound),
            );
            log::info!("starting with {} alarms", clock.store().len());
            gui::run(clock, settings).map_err(|e| anyhow::anyhow!("{e}"))?;
        }
    }
    Ok(())
}

fn open_store(settings: &Settings) -> anyhow::Result<AlarmStore> {
    if !settings.persist {
        bail!("persistence is turned off in the config, alarm changes would be lost");
    }
    Ok(AlarmStore::load(
        settings.alarm_count,
        Box::new(TomlAlarmFile::new(Settings::alarms_path())),
    ))
}
