// src/planner/atmosphere.rs
//
// ISA temperature model and Mach/TAS conversion. All functions are pure;
// `mach_to_tas` and `tas_to_mach` are exact algebraic inverses of each
// other.

/// Sea-level standard temperature, kelvin.
pub const SEA_LEVEL_TEMP_K: f64 = 288.15;

/// Standard lapse rate expressed per foot (1.9812 C per 1000 ft).
pub const LAPSE_RATE_K_PER_FT: f64 = 0.0019812;

/// Temperature above the tropopause is constant.
pub const TROPOPAUSE_TEMP_K: f64 = 216.65;

/// Sea-level speed of sound reference, knots.
pub const SEA_LEVEL_SPEED_OF_SOUND_KT: f64 = 661.5;

/// Ambient temperature in kelvin at `altitude_ft`, shifted by the ISA
/// deviation in degrees C.
pub fn ambient_temp_k(altitude_ft: f64, temp_deviation_c: f64) -> f64 {
    let isa = (SEA_LEVEL_TEMP_K - LAPSE_RATE_K_PER_FT * altitude_ft).max(TROPOPAUSE_TEMP_K);
    isa + temp_deviation_c
}

/// Local speed of sound in knots, scaled from the fixed sea-level
/// reference by the square root of the temperature ratio.
pub fn speed_of_sound_kt(altitude_ft: f64, temp_deviation_c: f64) -> f64 {
    SEA_LEVEL_SPEED_OF_SOUND_KT * (ambient_temp_k(altitude_ft, temp_deviation_c) / SEA_LEVEL_TEMP_K).sqrt()
}

/// True airspeed in knots for a Mach number at altitude.
pub fn mach_to_tas(mach: f64, altitude_ft: f64, temp_deviation_c: f64) -> f64 {
    mach * speed_of_sound_kt(altitude_ft, temp_deviation_c)
}

/// Mach number for a true airspeed at altitude.
pub fn tas_to_mach(tas_kt: f64, altitude_ft: f64, temp_deviation_c: f64) -> f64 {
    tas_kt / speed_of_sound_kt(altitude_ft, temp_deviation_c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sea_level_standard_day() {
        assert!((speed_of_sound_kt(0.0, 0.0) - SEA_LEVEL_SPEED_OF_SOUND_KT).abs() < 1e-9);
        assert!((mach_to_tas(0.5, 0.0, 0.0) - 330.75).abs() < 1e-9);
    }

    #[test]
    fn temperature_falls_with_altitude_until_the_tropopause() {
        assert!(ambient_temp_k(10_000.0, 0.0) < ambient_temp_k(0.0, 0.0));
        // Above ~36,000 ft ISA temperature is flat.
        assert_eq!(ambient_temp_k(40_000.0, 0.0), TROPOPAUSE_TEMP_K);
        assert_eq!(ambient_temp_k(50_000.0, 0.0), TROPOPAUSE_TEMP_K);
    }

    #[test]
    fn warm_air_raises_tas_for_the_same_mach() {
        let standard = mach_to_tas(0.82, 35_000.0, 0.0);
        let warm = mach_to_tas(0.82, 35_000.0, 15.0);
        assert!(warm > standard);
    }

    #[test]
    fn mach_tas_round_trip() {
        for &altitude in &[0.0, 10_000.0, 35_000.0] {
            for &deviation in &[-20.0, 0.0, 20.0] {
                for &mach in &[0.5, 0.78, 0.82, 0.9] {
                    let tas = mach_to_tas(mach, altitude, deviation);
                    let back = tas_to_mach(tas, altitude, deviation);
                    assert!(
                        (back - mach).abs() < 1e-6,
                        "alt {altitude} dev {deviation} mach {mach} -> {back}"
                    );
                }
            }
        }
    }
}
