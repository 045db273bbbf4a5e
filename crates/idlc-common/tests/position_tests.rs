use super::*;

#[test]
fn test_line_map_simple() {
    let source = "line1\nline2\nline3";
    let map = LineMap::build(source);

    // First character of first line
    assert_eq!(map.offset_to_position(0, source), Position::new(0, 0));
    // Last character of first line
    assert_eq!(map.offset_to_position(4, source), Position::new(0, 4));
    // First character of second line
    assert_eq!(map.offset_to_position(6, source), Position::new(1, 0));
    // First character of third line
    assert_eq!(map.offset_to_position(12, source), Position::new(2, 0));
}

#[test]
fn test_line_map_windows_line_endings() {
    let source = "line1\r\nline2\r\nline3";
    let map = LineMap::build(source);

    // First character of second line (after \r\n)
    assert_eq!(map.offset_to_position(7, source), Position::new(1, 0));
}

#[test]
fn test_line_map_multibyte_columns() {
    let source = "A \u{1F680} B";
    let map = LineMap::build(source);

    let pos_rocket = map.offset_to_position(2, source);
    assert_eq!(pos_rocket.character, 2);

    let pos_b = map.offset_to_position(source.find('B').unwrap() as u32, source);
    assert_eq!(pos_b.character, 4);
}
