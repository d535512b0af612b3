//! Compiling user source into a lattice rule

use lattice::{ColorId, Rule, RuleError};
use mlua::prelude::*;

use crate::{Error, Result};

/// A compiled user rule backed by its own Lua VM.
///
/// The function handle keeps its Lua state alive, so each rule owns an
/// isolated VM for as long as it exists.
pub struct LuaRule {
    _lua: Lua,
    func: LuaFunction,
}

impl LuaRule {
    /// Wrap, load and smoke-test the user source.
    ///
    /// The source lines become the body of a global `rule(x, y, z)` whose
    /// fallthrough result is 0, then the function is smoke-tested at the
    /// origin so obviously broken rules are reported immediately instead of
    /// silently emptying the scene.
    pub fn compile(source: &str) -> Result<Self> {
        let lua = Lua::new();
        let wrapped = wrap_source(source);

        lua.load(&wrapped).set_name("rule").exec()?;
        let func: LuaFunction = lua.globals().get("rule")?;

        let rule = Self { _lua: lua, func };
        rule.invoke(0, 0, 0)
            .map_err(|e| Error::SmokeTest(e.to_string()))?;
        Ok(rule)
    }

    fn invoke(&self, x: i32, y: i32, z: i32) -> mlua::Result<LuaValue> {
        self.func.call((x, y, z))
    }
}

impl Rule for LuaRule {
    fn color_at(&self, x: i32, y: i32, z: i32) -> std::result::Result<ColorId, RuleError> {
        let value = self
            .invoke(x, y, z)
            .map_err(|e| RuleError(e.to_string()))?;
        Ok(value_to_color_id(&value))
    }
}

/// Wrap raw statements into a rule function with an implicit `return 0`.
///
/// The body sits inside a `do ... end` block so a trailing `return` in the
/// user code stays the last statement of its own block; the fallthrough
/// `return 0` remains reachable when the body never returns.
fn wrap_source(source: &str) -> String {
    let mut wrapped = String::from("function rule(x, y, z)\ndo\n");
    for line in source.lines() {
        if line.trim().is_empty() {
            continue;
        }
        wrapped.push_str(line);
        wrapped.push('\n');
    }
    wrapped.push_str("end\nreturn 0\nend\n");
    wrapped
}

/// Integer-valued results map to color ids; anything else is empty
fn value_to_color_id(value: &LuaValue) -> ColorId {
    match value {
        LuaValue::Integer(i) => ColorId::try_from(*i).unwrap_or(0),
        LuaValue::Number(f) if f.fract() == 0.0 && *f >= 0.0 && *f <= ColorId::MAX as f64 => {
            *f as ColorId
        }
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattice::evaluate;

    #[test]
    fn test_constant_rule() {
        let rule = LuaRule::compile("return 1").unwrap();
        assert_eq!(rule.color_at(0, 0, 0).unwrap(), 1);
        assert_eq!(rule.color_at(3, -3, 3).unwrap(), 1);
    }

    #[test]
    fn test_implicit_return_zero() {
        let rule = LuaRule::compile("local a = x + y + z").unwrap();
        assert_eq!(rule.color_at(1, 1, 1).unwrap(), 0);
    }

    #[test]
    fn test_conditional_rule() {
        let rule =
            LuaRule::compile("if x == 0 and y == 0 and z == 0 then return 5 end").unwrap();
        assert_eq!(rule.color_at(0, 0, 0).unwrap(), 5);
        assert_eq!(rule.color_at(1, 0, 0).unwrap(), 0);
    }

    #[test]
    fn test_syntax_error_reported() {
        assert!(matches!(
            LuaRule::compile("if x == then return 1"),
            Err(Error::Lua(_))
        ));
    }

    #[test]
    fn test_smoke_test_failure_reported() {
        assert!(matches!(
            LuaRule::compile("error('nope')"),
            Err(Error::SmokeTest(_))
        ));
    }

    #[test]
    fn test_per_cell_errors_leave_other_cells_intact() {
        // Raises everywhere except the x == 0 plane; the origin smoke test
        // passes, and evaluation treats every raising cell as empty.
        let rule =
            LuaRule::compile("if x ~= 0 then error('bad cell') end\nreturn 2").unwrap();
        let map = evaluate(&rule);
        assert_eq!(map.len(), 49);
        assert!(map.keys().all(|c| c.x == 0));
        assert!(map.values().all(|id| *id == 2));
    }

    #[test]
    fn test_non_integer_result_is_empty() {
        let rule = LuaRule::compile("return 'red'").unwrap();
        assert_eq!(rule.color_at(0, 0, 0).unwrap(), 0);
    }

    #[test]
    fn test_float_valued_integer_accepted() {
        let rule = LuaRule::compile("return 2.0").unwrap();
        assert_eq!(rule.color_at(0, 0, 0).unwrap(), 2);
    }

    #[test]
    fn test_blank_lines_skipped_by_wrapper() {
        let rule = LuaRule::compile("\n\nreturn 4\n\n").unwrap();
        assert_eq!(rule.color_at(0, 0, 0).unwrap(), 4);
    }

    #[test]
    fn test_lattice_evaluation_of_compiled_rule() {
        let rule = LuaRule::compile("if x + y + z == 0 then return 6 end").unwrap();
        let map = evaluate(&rule);
        assert!(!map.is_empty());
        assert!(map.keys().all(|c| c.x + c.y + c.z == 0));
    }
}
