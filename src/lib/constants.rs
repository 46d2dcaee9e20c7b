pub const NODATAVAL: f64 = -9999.0;

/// Conversion of a daily mean power flux [W m^-2] to a daily energy flux [MJ m^-2 day^-1]
pub const RADIATION_CONVERSION: f64 = 0.0864;
