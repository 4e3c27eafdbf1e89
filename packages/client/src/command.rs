//! Prompt command parser.

use sketchroom_shared::protocol::{Point, Tool};

use crate::error::CommandError;

pub const HELP: &str = "\
commands:
  draw x,y x,y ...   draw one stroke through the given points
  cursor x,y         move your cursor
  undo | redo        undo or redo the latest stroke in the room
  clear              clear the whole canvas
  name <new name>    change your display name
  tool brush|eraser  select the drawing tool
  color <css color>  select the stroke color
  width <n>          select the line width
  status             show users, strokes and your style
  help               show this help
";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Draw(Vec<Point>),
    Cursor(Point),
    Undo,
    Redo,
    Clear,
    Name(String),
    Tool(Tool),
    Color(String),
    Width(f64),
    Status,
    Help,
}

/// Parse one prompt line
pub fn parse(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (keyword, rest) = match line.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (line, ""),
    };

    match keyword {
        "draw" => {
            let points = rest
                .split_whitespace()
                .map(parse_point)
                .collect::<Result<Vec<_>, _>>()?;
            if points.is_empty() {
                return Err(CommandError::MissingArgument("draw"));
            }
            Ok(Command::Draw(points))
        }
        "cursor" => parse_point(required("cursor", rest)?).map(Command::Cursor),
        "undo" => Ok(Command::Undo),
        "redo" => Ok(Command::Redo),
        "clear" => Ok(Command::Clear),
        "name" => Ok(Command::Name(required("name", rest)?.to_string())),
        "tool" => match required("tool", rest)? {
            "brush" => Ok(Command::Tool(Tool::Brush)),
            "eraser" => Ok(Command::Tool(Tool::Eraser)),
            other => Err(CommandError::InvalidTool(other.to_string())),
        },
        "color" => Ok(Command::Color(required("color", rest)?.to_string())),
        "width" => {
            let arg = required("width", rest)?;
            match arg.parse::<f64>() {
                Ok(width) if width.is_finite() && width > 0.0 => Ok(Command::Width(width)),
                _ => Err(CommandError::InvalidWidth(arg.to_string())),
            }
        }
        "status" => Ok(Command::Status),
        "help" => Ok(Command::Help),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

fn required<'a>(keyword: &'static str, rest: &'a str) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument(keyword))
    } else {
        Ok(rest)
    }
}

fn parse_point(token: &str) -> Result<Point, CommandError> {
    let invalid = || CommandError::InvalidPoint(token.to_string());
    let (x, y) = token.split_once(',').ok_or_else(invalid)?;
    let x = x.trim().parse::<f64>().map_err(|_| invalid())?;
    let y = y.trim().parse::<f64>().map_err(|_| invalid())?;
    let point = Point::new(x, y);
    if !point.is_finite() {
        return Err(invalid());
    }
    Ok(point)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_draw_with_points() {
        // テスト項目: draw コマンドが点列として解析される
        // given (前提条件):
        let line = "draw 0,0 10.5,20 30,-4";

        // when (操作):
        let result = parse(line);

        // then (期待する結果):
        assert_eq!(
            result,
            Ok(Command::Draw(vec![
                Point::new(0.0, 0.0),
                Point::new(10.5, 20.0),
                Point::new(30.0, -4.0),
            ]))
        );
    }

    #[test]
    fn test_parse_draw_without_points() {
        // テスト項目: 点のない draw は引数不足になる
        // given (前提条件):
        let line = "draw";

        // when (操作):
        let result = parse(line);

        // then (期待する結果):
        assert_eq!(result, Err(CommandError::MissingArgument("draw")));
    }

    #[test]
    fn test_parse_rejects_non_finite_point() {
        // テスト項目: 有限でない座標は拒否される
        // given (前提条件):
        let line = "cursor NaN,1";

        // when (操作):
        let result = parse(line);

        // then (期待する結果):
        assert_eq!(result, Err(CommandError::InvalidPoint("NaN,1".to_string())));
    }

    #[test]
    fn test_parse_name_keeps_inner_spaces() {
        // テスト項目: name の引数は空白を含めてそのまま渡される
        // given (前提条件):
        let line = "  name  Alice Liddell ";

        // when (操作):
        let result = parse(line);

        // then (期待する結果):
        assert_eq!(result, Ok(Command::Name("Alice Liddell".to_string())));
    }

    #[test]
    fn test_parse_tool_and_width() {
        // テスト項目: tool と width が解析され、不正な値は拒否される
        // given (前提条件):

        // when (操作):
        let eraser = parse("tool eraser");
        let pencil = parse("tool pencil");
        let width = parse("width 2.5");
        let zero = parse("width 0");

        // then (期待する結果):
        assert_eq!(eraser, Ok(Command::Tool(Tool::Eraser)));
        assert_eq!(pencil, Err(CommandError::InvalidTool("pencil".to_string())));
        assert_eq!(width, Ok(Command::Width(2.5)));
        assert_eq!(zero, Err(CommandError::InvalidWidth("0".to_string())));
    }

    #[test]
    fn test_parse_unknown_command() {
        // テスト項目: 未知のコマンドはエラーになる
        // given (前提条件):
        let line = "paint 1,1";

        // when (操作):
        let result = parse(line);

        // then (期待する結果):
        assert_eq!(result, Err(CommandError::Unknown("paint".to_string())));
    }
}
