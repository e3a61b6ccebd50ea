use std::{io, result};

pub fn setup_logging(verbosity_level: u32) -> anyhow::Result<()> {
    use fern::colors::{Color, ColoredLevelConfig};

    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::White)
        .debug(Color::BrightWhite)
        .trace(Color::Cyan);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            let color = colors.get_color(&record.level());
            let prefix = format!(
                "{}[{}][{}]\x1b[{}m ",
                chrono::Local::now().format("[%Y-%m-%d %H:%M:%S]"),
                record.target(),
                record.level(),
                color.to_fg_str()
            );
            const SUFFIX: &str = "\x1b[0m";

            let s = format!("{}", message);
            let mut buf = String::with_capacity(s.len() + prefix.len() + SUFFIX.len());
            for (i, line) in s.split('\n').enumerate() {
                if i != 0 {
                    buf.push('\n');
                }
                buf += &prefix;
                buf += line;
                buf += SUFFIX;
            }

            out.finish(format_args!("{}", buf))
        })
        .level(match verbosity_level {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        })
        .chain(io::stderr())
        .apply()?;

    Ok(())
}

pub fn parse_size(x: &str) -> result::Result<u64, String> {
    const MULTIPLIERS: [(char, u64); 5] = [
        ('K', 1 << 10),
        ('M', 1 << 20),
        ('G', 1 << 30),
        ('T', 1 << 40),
        ('E', 1 << 60),
    ];

    let (digits, multiplier) = match x.chars().last() {
        Some(y) if x.len() > 1 && !y.is_ascii_digit() => {
            let y = y.to_ascii_uppercase();
            let m = MULTIPLIERS
                .iter()
                .find(|(unit, _)| *unit == y)
                .map(|(_, m)| *m)
                .ok_or_else(|| "Unknown unit".to_owned())?;
            (&x[..x.len() - 1], m)
        }
        _ => (x, 1),
    };

    let n = digits.parse::<u64>().map_err(|e| e.to_string())?;
    n.checked_mul(multiplier)
        .ok_or_else(|| "Number too large to fit into u64".to_owned())
}

#[allow(non_upper_case_globals)]
pub fn size_to_string(s: u64) -> String {
    const KiB: u64 = 1 << 10;
    const MiB: u64 = 1 << 20;
    const GiB: u64 = 1 << 30;
    const TiB: u64 = 1 << 40;

    match s {
        0..=1023 => format!("{} B", s),
        1024..=1048575 => format!("{} KiB", s / KiB),
        1048576..=1073741823 => format!("{} MiB", s / MiB),
        1073741824..=1099511627775 => format!("{} GiB", s / GiB),
        _ => format!("{} TiB", s / TiB),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_size, size_to_string};

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("432").unwrap(), 432);
        assert_eq!(parse_size("432K").unwrap(), 432 * 1024);
        assert_eq!(parse_size("432m").unwrap(), 432 * 1024 * 1024);
        assert_eq!(parse_size("7G").unwrap(), 7 * 1024 * 1024 * 1024);
        assert_eq!(parse_size("0").unwrap(), 0);
        assert_eq!(parse_size("0E").unwrap(), 0);
        assert!(parse_size("1.5G").is_err());
        assert!(parse_size("12X").is_err());
        assert!(parse_size("16E").is_err());
    }

    #[test]
    fn test_size_to_string() {
        assert_eq!(size_to_string(32), "32 B");
        assert_eq!(size_to_string(3 << 20), "3 MiB");
        assert_eq!(size_to_string(5 << 40), "5 TiB");
    }
}
