use chrono::{DateTime, Local};
use rand::{Rng, seq::IndexedRandom};

const METHODS: [(&str, u8); 4] = [("GET", 12), ("POST", 3), ("HEAD", 1), ("PUT", 1)];
const PATHS: [(&str, u8); 12] = [
    ("/", 30),
    ("/index.php", 20),
    ("/contact", 6),
    ("/api/v1/items", 10),
    ("/static/app.js", 12),
    ("/static/site.css", 10),
    ("/images/logo.png", 8),
    ("/images/Banner.JPG", 4),
    ("/favicon.gif", 3),
    ("/wp-login.php", 8),
    ("/blog/wp-admin/admin-ajax.php", 4),
    ("/.env", 2),
];
const STATUS: [(u16, u8); 8] = [
    (200, 60),
    (301, 5),
    (304, 10),
    (403, 4),
    (404, 15),
    (500, 3),
    (502, 1),
    (503, 2),
];
const REFERRERS: [(&str, u8); 4] = [
    ("-", 50),
    ("https://www.google.com/", 20),
    ("https://example.com/", 15),
    ("https://t.co/x1y2z3", 5),
];
const USER_AGENTS: [(&str, u8); 6] = [
    (
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36",
        40,
    ),
    ("Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) Mobile/15E148", 15),
    ("Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)", 10),
    ("Mozilla/5.0 (compatible; AhrefsBot/7.0; +http://ahrefs.com/robot/)", 6),
    ("curl/8.5.0", 5),
    ("python-requests/2.31.0", 4),
];
const MALFORMED_RATIO: f64 = 0.005;

fn pick<R: Rng + ?Sized, T: Copy>(rng: &mut R, table: &[(T, u8)]) -> T {
    table
        .choose_weighted(rng, |(_, w)| *w)
        .map_or(table[0].0, |(v, _)| *v)
}

/// One combined-format line stamped `at`, occasionally deliberately broken.
pub fn generate_domlog_line<R: Rng + ?Sized>(rng: &mut R, at: DateTime<Local>) -> String {
    let ip = format!(
        "{}.{}.{}.{}",
        rng.random_range(1..224),
        rng.random_range(0..256),
        rng.random_range(0..256),
        rng.random_range(1..255)
    );
    let timestamp = at.format("%d/%b/%Y:%H:%M:%S %z");
    let method = pick(rng, &METHODS);
    let path = pick(rng, &PATHS);

    if rng.random_bool(MALFORMED_RATIO) {
        return format!("{ip} - - [{timestamp}] \"{method} {path}\" ???");
    }

    let status = pick(rng, &STATUS);
    let size = rng.random_range(100..20_000);
    let referrer = pick(rng, &REFERRERS);
    let agent = pick(rng, &USER_AGENTS);
    format!("{ip} - - [{timestamp}] \"{method} {path} HTTP/1.1\" {status} {size} \"{referrer}\" \"{agent}\"")
}
