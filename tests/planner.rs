use std::fs;
use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;
use transit_planner::{
    plan_transit_journey, Coordinate, DirectPlanner, ScheduleConfig, ScheduleError,
    ScheduleIndex, SharedSchedule, VehicleType,
};

const CENTRAL: Coordinate = Coordinate {
    latitude: 56.947,
    longitude: 24.113,
};
const UNIVERSITY: Coordinate = Coordinate {
    latitude: 56.950,
    longitude: 24.105,
};

fn write_feed(dir: &Path, stop_times: &str) {
    fs::write(
        dir.join("stops.txt"),
        "stop_id,stop_name,stop_lat,stop_lon\n\
         stop_A,Central Station,56.947,24.113\n\
         stop_B,Market,56.944,24.115\n\
         stop_C,University,56.950,24.105\n",
    )
    .unwrap();
    fs::write(
        dir.join("routes.txt"),
        "route_id,route_short_name,route_type\nroute_1,10,3\n",
    )
    .unwrap();
    fs::write(
        dir.join("trips.txt"),
        "route_id,service_id,trip_id,trip_headsign\nroute_1,weekday,trip_1,University\n",
    )
    .unwrap();
    fs::write(dir.join("stop_times.txt"), stop_times).unwrap();
}

const STOP_TIMES: &str = "trip_id,arrival_time,departure_time,stop_id,stop_sequence\n\
                          trip_1,10:00:00,10:00:00,stop_A,1\n\
                          trip_1,10:05:00,10:05:00,stop_B,2\n\
                          trip_1,10:10:00,10:10:00,stop_C,3\n";

fn fixture() -> (TempDir, DirectPlanner) {
    let dir = tempfile::tempdir().unwrap();
    write_feed(dir.path(), STOP_TIMES);
    let schedule = ScheduleIndex::load(&ScheduleConfig::new(dir.path())).unwrap();
    (dir, DirectPlanner::new(Arc::new(schedule)))
}

#[test]
fn loads_fixture_feed() {
    let (_dir, planner) = fixture();
    let schedule = planner.schedule();
    assert_eq!(schedule.stops().len(), 3);
    assert_eq!(schedule.route_count(), 1);
    assert_eq!(schedule.row_count(), 3);
}

#[test]
fn direct_route_found() {
    let (_dir, planner) = fixture();
    let leg = planner.plan(CENTRAL, UNIVERSITY, "10:15").unwrap();

    assert_eq!(leg.vehicle_type, VehicleType::Bus);
    assert_eq!(leg.route_short_name, "10");
    assert_eq!(leg.start_stop_name, "Central Station");
    assert_eq!(leg.end_stop_name, "University");
    assert_eq!(leg.arrival_time, "10:10");
    assert_eq!(leg.num_stops, 2);
}

#[test]
fn deadline_before_every_arrival() {
    let (_dir, planner) = fixture();
    assert!(planner.plan(CENTRAL, UNIVERSITY, "09:00").is_none());
}

#[test]
fn same_start_and_end() {
    let (_dir, planner) = fixture();
    assert!(planner.plan(CENTRAL, CENTRAL, "10:15").is_none());
}

#[test]
fn distant_points_still_resolve_to_a_stop() {
    let (_dir, planner) = fixture();
    let sydney = Coordinate::new(-33.8688, 151.2093);
    let nearest = planner.nearest_stop(sydney).unwrap();
    assert!(nearest.distance_km > 1000.0);

    // Both ends snap to the same stop, so planning fails downstream.
    let nearby = Coordinate::new(-33.87, 151.21);
    assert_eq!(planner.nearest_stop(nearby).unwrap().stop, nearest.stop);
    assert!(planner.plan(sydney, nearby, "10:15").is_none());
}

#[test]
fn stop_time_with_unknown_trip_is_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let stop_times = format!("{STOP_TIMES}ghost_trip,10:20:00,10:20:00,stop_C,4\n");
    write_feed(dir.path(), &stop_times);

    let schedule = ScheduleIndex::load(&ScheduleConfig::new(dir.path())).unwrap();
    assert_eq!(schedule.row_count(), 3);
    assert_eq!(schedule.visits_at("stop_C").len(), 1);

    let planner = DirectPlanner::new(Arc::new(schedule));
    let leg = planner.plan(CENTRAL, UNIVERSITY, "10:30").unwrap();
    assert_eq!(leg.arrival_time, "10:10");
}

#[test]
fn malformed_rows_do_not_abort_loading() {
    let dir = tempfile::tempdir().unwrap();
    let stop_times = format!("{STOP_TIMES}trip_1,later,10:20:00,stop_B,4\ntrip_1,10:30:00\n");
    write_feed(dir.path(), &stop_times);

    let schedule = ScheduleIndex::load(&ScheduleConfig::new(dir.path())).unwrap();
    assert_eq!(schedule.row_count(), 3);
}

#[test]
fn missing_gtfs_directory_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = ScheduleConfig::new(dir.path().join("absent"));
    assert!(matches!(
        ScheduleIndex::load(&config),
        Err(ScheduleError::MissingDirectory(_))
    ));
}

#[test]
fn lazy_schedule_loads_once_on_first_plan() {
    let dir = tempfile::tempdir().unwrap();
    write_feed(dir.path(), STOP_TIMES);
    let shared = SharedSchedule::new(ScheduleConfig::new(dir.path()));
    assert!(!shared.is_loaded());

    let leg = plan_transit_journey(&shared, 56.947, 24.113, 56.950, 24.105, "10:15")
        .unwrap()
        .unwrap();
    assert_eq!(leg.route_short_name, "10");
    assert!(shared.is_loaded());

    // Later edits on disk are not picked up.
    fs::remove_file(dir.path().join("stop_times.txt")).unwrap();
    let again = plan_transit_journey(&shared, 56.947, 24.113, 56.950, 24.105, "10:15").unwrap();
    assert_eq!(again, Some(leg));
}

#[test]
fn lazy_schedule_reports_load_failure() {
    let shared = SharedSchedule::new(ScheduleConfig::new("/nonexistent/gtfs"));
    assert!(plan_transit_journey(&shared, 0.0, 0.0, 1.0, 1.0, "10:00").is_err());
}
