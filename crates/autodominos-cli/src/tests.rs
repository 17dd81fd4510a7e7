use super::*;

#[test]
fn parses_probe_without_filters() {
    let cli = Cli::try_parse_from(["autodominos", "probe"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Probe {
            only_type: None,
            limit: None
        }
    ));
}

#[test]
fn parses_probe_with_type_and_limit() {
    let cli = Cli::try_parse_from([
        "autodominos",
        "probe",
        "--only-type",
        "pick-up",
        "--limit",
        "20",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Commands::Probe {
            only_type: Some(OrderType::PickUp),
            limit: Some(20)
        }
    ));
}

#[test]
fn rejects_unknown_order_type() {
    let result = Cli::try_parse_from(["autodominos", "probe", "--only-type", "drone"]);
    assert!(result.is_err());
}

#[test]
fn parses_check_command() {
    let cli = Cli::try_parse_from([
        "autodominos",
        "check",
        "--province",
        "Madrid",
        "--city",
        "Madrid",
        "--street",
        "Gran Vía",
        "--number",
        "1",
        "--code",
        "SAVE10",
    ])
    .unwrap();
    match cli.command {
        Commands::Check {
            number,
            order_type,
            code,
            ..
        } => {
            assert_eq!(number, 1);
            assert_eq!(order_type, OrderType::Delivery);
            assert_eq!(code, "SAVE10");
        }
        other => panic!("expected check command, got {other:?}"),
    }
}

#[test]
fn parses_codes_normalize() {
    let cli = Cli::try_parse_from(["autodominos", "codes", "normalize"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Codes {
            command: CodesCommands::Normalize
        }
    ));
}

#[test]
fn locations_refresh_requires_provinces_file() {
    assert!(Cli::try_parse_from(["autodominos", "locations", "refresh"]).is_err());
    let cli = Cli::try_parse_from([
        "autodominos",
        "locations",
        "refresh",
        "--provinces",
        "data/provinces.json",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Commands::Locations {
            command: LocationsCommands::Refresh { .. }
        }
    ));
}

#[test]
fn missing_subcommand_is_an_error() {
    assert!(Cli::try_parse_from(["autodominos"]).is_err());
}
