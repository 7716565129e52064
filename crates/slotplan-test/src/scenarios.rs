//! Small instances with hand-checked scores.
//!
//! Unless stated otherwise, orders and depots sit on the same coordinate so
//! distance contributes nothing, and no time windows are set.

use slotplan_core::Schedule;

use crate::builders::{bucket, order, schedule};

/// Three orders allowed only on day 1, one day-1 bucket with capacity 2.
pub fn over_subscribed_day() -> Schedule {
    schedule(
        vec![order("O-1", &[1]), order("O-2", &[1]), order("O-3", &[1])],
        vec![bucket("B-1", "R-1", 1, 2)],
    )
}

/// One order requiring `ELECTRICAL`, one bucket whose rider only has `GENERAL`.
pub fn missing_skill() -> Schedule {
    schedule(
        vec![order("O-1", &[1]).required_skill("ELECTRICAL")],
        vec![bucket("B-1", "R-1", 1, 5).rider_skill("GENERAL")],
    )
}

/// Two orders about 1.0 km apart and two buckets on the same day.
///
/// Depots sit on the first order so only the second order pays distance.
pub fn nearby_pair() -> Schedule {
    // 0.009 degrees of latitude is 1.0 km.
    schedule(
        vec![
            order("O-1", &[1]).location(52.0, 4.0),
            order("O-2", &[1]).location(52.009, 4.0),
        ],
        vec![
            bucket("B-1", "R-1", 1, 5).depot(52.0, 4.0),
            bucket("B-2", "R-2", 1, 5).depot(52.0, 4.0),
        ],
    )
}

/// Two 60 kg orders and a bucket limited to 100 kg.
pub fn heavy_pair() -> Schedule {
    schedule(
        vec![
            order("O-1", &[1]).weight(60.0),
            order("O-2", &[1]).weight(60.0),
        ],
        vec![bucket("B-1", "R-1", 1, 5).vehicle(100.0, 50.0)],
    )
}

/// A mixed instance touching every constraint: movable orders, time windows,
/// skills, vehicle limits, buffers and scattered locations.
pub fn mixed_week() -> Schedule {
    use crate::builders::time;

    schedule(
        vec![
            order("O-01", &[1, 2, 3]).location(52.010, 4.010).weight(20.4).volume(0.35),
            order("O-02", &[1]).location(52.011, 4.012).weight(35.0).volume(1.2),
            order("O-03", &[2, 3]).location(52.100, 4.200).time_window(time(10, 0), time(12, 0)),
            order("O-04", &[3]).location(52.013, 4.011).required_skill("COLD"),
            order("O-05", &[1, 3]).location(52.200, 4.050).weight(55.6).time_window(time(6, 0), time(7, 45)),
            order("O-06", &[2]).location(52.012, 4.009).volume(2.26),
            order("O-07", &[1, 2]).location(51.990, 3.990).required_skills(["COLD", "HEAVY"]),
            order("O-08", &[3]).location(52.050, 4.100).weight(9.5),
        ],
        vec![
            bucket("B-1", "R-1", 1, 3).depot(52.0, 4.0).vehicle(80.0, 2.0).movable_occupation_ratio_threshold(0.34),
            bucket("B-2", "R-1", 2, 4).depot(52.0, 4.0).buffer_ratio(0.25).rider_skill("COLD"),
            bucket("B-3", "R-2", 2, 2).depot(52.1, 4.1).vehicle(40.0, 1.0),
            bucket("B-4", "R-2", 3, 5).depot(52.1, 4.1).rider_skills(["COLD", "HEAVY"]).buffer_ratio(0.2),
        ],
    )
}
