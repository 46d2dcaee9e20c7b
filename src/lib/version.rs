pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\nsimplified Penman equations: Valiantzas (2006), J. Hydrol. 331(3-4), 690-702"
);
