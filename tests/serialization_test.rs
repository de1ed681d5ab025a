use anyhow::Result;
use transit_catalogue::{Base, Coordinates, RenderSettings, RouteKind, RoutingSettings};

/// Five stops, two buses, asymmetric distances, a deliberately unreachable
/// island stop.
fn sample_base() -> Result<Base> {
    let mut base = Base::new(RenderSettings::default());
    let airport = base.add_stop("Airport", Coordinates::new(43.444, 39.9458))?;
    let harbour = base.add_stop("Harbour", Coordinates::new(43.4612, 39.9392))?;
    let market = base.add_stop("Market", Coordinates::new(43.4708, 39.9311))?;
    let depot = base.add_stop("Depot", Coordinates::new(43.48, 39.92))?;
    let island = base.add_stop("Island", Coordinates::new(43.6, 40.1))?;

    base.add_distance(airport, harbour, 2600);
    base.add_distance(harbour, airport, 2500);
    base.add_distance(harbour, market, 1500);
    base.add_distance(market, depot, 1700);
    base.add_distance(depot, market, 1900);
    base.add_distance(depot, airport, 5000);
    base.add_distance(island, island, 100);

    base.add_bus(
        "24",
        vec![airport, harbour, market, depot],
        RouteKind::Linear,
    )?;
    base.add_bus(
        "114",
        vec![airport, harbour, market, depot, airport],
        RouteKind::Circular,
    )?;
    base.add_bus("loop", vec![island, island], RouteKind::Circular)?;

    base.build_router(RoutingSettings {
        bus_wait_time: 4,
        bus_velocity: 42.0,
    })?;
    Ok(base)
}

const STOPS: [&str; 5] = ["Airport", "Harbour", "Market", "Depot", "Island"];
const BUSES: [&str; 3] = ["24", "114", "loop"];

#[test]
fn round_trip_preserves_every_response() -> Result<()> {
    let base = sample_base()?;
    let mut buffer = Vec::new();
    base.save_to(&mut buffer)?;
    let reloaded = Base::load_from(&mut buffer.as_slice())?;

    for name in STOPS {
        assert_eq!(base.stop_report(name), reloaded.stop_report(name));
    }
    assert_eq!(base.stop_report("missing"), None);
    assert_eq!(reloaded.stop_report("missing"), None);

    for name in BUSES {
        assert_eq!(base.bus_report(name)?, reloaded.bus_report(name)?);
    }

    for from in STOPS {
        for to in STOPS {
            assert_eq!(
                base.route(from, to),
                reloaded.route(from, to),
                "journey {} → {} changed across the codec",
                from,
                to
            );
        }
    }

    assert_eq!(base.render_settings, reloaded.render_settings);
    assert_eq!(base.render_map(), reloaded.render_map());
    Ok(())
}

#[test]
fn round_trip_is_stable_byte_for_byte() -> Result<()> {
    let base = sample_base()?;
    let mut first = Vec::new();
    base.save_to(&mut first)?;

    let reloaded = Base::load_from(&mut first.as_slice())?;
    let mut second = Vec::new();
    reloaded.save_to(&mut second)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn reload_keeps_reachability_exact() -> Result<()> {
    let base = sample_base()?;
    let mut buffer = Vec::new();
    base.save_to(&mut buffer)?;
    let reloaded = Base::load_from(&mut buffer.as_slice())?;

    // the island is disconnected from the mainland in both worlds
    assert!(reloaded.route("Airport", "Island").is_none());
    assert!(reloaded.route("Island", "Airport").is_none());
    // and its degenerate self-loop journey stays trivial
    let trivial = reloaded.route("Island", "Island").unwrap();
    assert_eq!(trivial.total_time, 0.0);
    assert!(trivial.activities.is_empty());
    Ok(())
}
