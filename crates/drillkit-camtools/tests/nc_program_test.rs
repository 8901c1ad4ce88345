use drillkit_camtools::excellon::DrillFileReader;
use drillkit_camtools::exc_cleaner::ExcellonCleaner;
use drillkit_camtools::nc_program::{NcProgramGenerator, NcProgramParameters};
use drillkit_camtools::speeds_feeds::SpeedsFeedsCalculator;
use drillkit_camtools::tool_table::ToolTableFormatter;

const TWO_TOOLS: &str = "M48
INCH
T1C0.0315
T2C0.0512
%
G90
G05
T1
X100Y-200
T2
X300Y400
M30
";

#[test]
fn test_two_tool_scenario() {
    let file = DrillFileReader::parse(TWO_TOOLS).unwrap();
    let ids: Vec<_> = file.tools.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, ["T1", "T2"]);
    assert!((file.tools.as_slice()[0].diameter_mm - 0.8001).abs() < 1e-9);
    assert!((file.tools.as_slice()[1].diameter_mm - 1.30048).abs() < 1e-9);

    let cleaned = ExcellonCleaner::clean(TWO_TOOLS).unwrap();
    assert!(cleaned.text.contains("X100Y200\n"));
    assert!(cleaned.text.contains("X300Y400\n"));

    let report = ToolTableFormatter::default().format(&file.tools);
    assert!(report.contains("T001  0.8 mm       T1\n"));
    assert!(report.contains("T002  1.3 mm       T2\n"));

    let nc = NcProgramGenerator::default().generate("board", &file).unwrap();
    let blocks = nc.blocks();
    let t1 = blocks.iter().position(|b| b == "T1 M9").unwrap();
    let t2 = blocks.iter().position(|b| b == "T2 M9").unwrap();
    assert!(t1 < t2);

    let small = SpeedsFeedsCalculator::calculate(0.8001);
    let medium = SpeedsFeedsCalculator::calculate(1.30048);
    assert_eq!(blocks[t1 + 3], "M3 S15800");
    assert_eq!(
        blocks[t1 + 4],
        format!("G81 X0.254 Y-0.508 Z-2.000 R1.000 F{}", small.feed_rate)
    );
    assert_eq!(blocks[t2 + 3], format!("M3 S{}", medium.spindle_speed));
    assert_eq!(
        blocks[t2 + 4],
        format!("G81 X0.762 Y1.016 Z-2.000 R1.000 F{}", medium.feed_rate)
    );
}

#[test]
fn test_block_structure_per_tool() {
    let text = "T1C0.04\n%\nT1\nX0Y0\nX0Y0\nX100Y0\nX100Y100\nX200Y300\nX200Y300\n";
    let file = DrillFileReader::parse(text).unwrap();
    let hits = file.blocks.hits("T1").len();
    let nc = NcProgramGenerator::default().generate("p", &file).unwrap();
    let blocks = nc.blocks();

    assert_eq!(blocks.iter().filter(|b| *b == "M6").count(), 1);
    assert_eq!(blocks.iter().filter(|b| b.starts_with("G0 ")).count(), 1);
    assert_eq!(blocks.iter().filter(|b| b.starts_with("M3 ")).count(), 1);
    assert_eq!(blocks.iter().filter(|b| b.starts_with("G81 ")).count(), 1);
    assert_eq!(blocks.iter().filter(|b| *b == "G80").count(), 1);
    assert_eq!(blocks.last().map(String::as_str), Some("M30"));
    assert_eq!(blocks.iter().filter(|b| *b == "M30").count(), 1);

    let motion = blocks
        .iter()
        .filter(|b| b.starts_with('X') || b.starts_with('Y'))
        .count();
    assert!(motion <= hits - 1);
    // two duplicates collapse
    assert_eq!(motion, 3);
}

#[test]
fn test_line_numbers_are_consecutive() {
    let file = DrillFileReader::parse(TWO_TOOLS).unwrap();
    let nc = NcProgramGenerator::default().generate("board", &file).unwrap();
    for (i, line) in nc.numbered_lines().enumerate() {
        assert!(line.starts_with(&format!("N{:04} ", i + 1)), "line {line}");
    }
    assert_eq!(nc.to_text().lines().count(), nc.len());
}

#[test]
fn test_custom_heights_and_width() {
    let params = NcProgramParameters {
        safe_height_mm: 10.0,
        drill_depth_mm: -1.8,
        retract_height_mm: 2.0,
        line_number_width: 3,
        ..Default::default()
    };
    let file = DrillFileReader::parse(TWO_TOOLS).unwrap();
    let nc = NcProgramGenerator::new(params).generate("board", &file).unwrap();
    let text = nc.to_text();
    assert!(text.starts_with("N001 (board)\n"));
    assert!(text.contains("G0 X0.254 Y-0.508 Z10.000\n"));
    assert!(text.contains(" Z-1.800 R2.000 "));
}

#[test]
fn test_program_without_hits() {
    let file = DrillFileReader::parse("T1C0.04\n%\nM30\n").unwrap();
    let nc = NcProgramGenerator::default().generate("empty", &file).unwrap();
    assert_eq!(nc.blocks().to_vec(), vec!["(empty)", "G90 G17", "M30"]);
}
