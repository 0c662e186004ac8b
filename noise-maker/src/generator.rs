use chrono::{DateTime, Local};
use rand::{Rng, seq::IndexedRandom};

const METHODS: [(&str, u8); 4] = [("GET", 6), ("POST", 2), ("PUT", 1), ("DELETE", 1)];
const PATHS: [(&str, u8); 7] = [
    ("/api/v2/banner/25019354", 30),
    ("/api/1/photogenic_banners/list/?server_name=WIN7RB4", 10),
    ("/api/v2/group/7786679/statistic/sites/?date_type=day", 10),
    ("/api/v2/internal/banner/24288647/info", 20),
    ("/export/appinstall_raw/2017-06-30/", 5),
    ("/api/v2/slot/4705/groups", 15),
    ("/accounts/login/", 10),
];
const STATUS: [(u16, u8); 5] = [(200, 80), (302, 5), (404, 10), (499, 2), (500, 3)];
// Upper bound of request_time per endpoint weight class, in seconds.
const SLOWNESS: [(f64, u8); 3] = [(0.2, 70), (1.5, 25), (30.0, 5)];
const MALFORMED: [&str; 4] = [
    "",
    "-",
    r#"1.138.198.128 -  - [29/Jun/2017:03:50:22 +0300] "0" 400 166 "-" "-" "-" "-" "-" 0.000"#,
    "truncated line without the trailing fields",
];

pub fn generate_ui_log<R: Rng + ?Sized>(rng: &mut R, at: DateTime<Local>) -> String {
    let ip = format!(
        "1.{}.{}.{}",
        rng.random_range(0..256),
        rng.random_range(0..256),
        rng.random_range(0..256)
    );
    let timestamp = at.format("%d/%b/%Y:%H:%M:%S %z");
    let method = METHODS.choose_weighted(rng, |(_, w)| *w).unwrap().0;
    let path = PATHS.choose_weighted(rng, |(_, w)| *w).unwrap().0;
    let status = STATUS.choose_weighted(rng, |(_, w)| *w).unwrap().0;
    let ceiling = SLOWNESS.choose_weighted(rng, |(_, w)| *w).unwrap().0;
    let size = rng.random_range(100..2000);
    let request_id = rng.random_range(1_000_000_000u64..2_000_000_000);
    let request_time: f64 = rng.random_range(0.0..ceiling);

    format!(
        "{ip} -  - [{timestamp}] \"{method} {path} HTTP/1.1\" {status} {size} \"-\" \"Lynx/2.8.8dev.9 libwww-FM/2.14\" \"-\" \"{request_id}-4708-9752759\" \"dc7161be3\" {request_time:.3}"
    )
}

pub fn generate_malformed<R: Rng + ?Sized>(rng: &mut R) -> String {
    MALFORMED.choose(rng).unwrap().to_string()
}
