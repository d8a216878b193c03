use crate::{
    eval::{
        environment::{Environment, DEFAULT_CAPACITY},
        error::{Result, RuntimeError},
        object::Object,
    },
    parser::ast::{Expr, Infix, Literal, Statement, VarType},
};
use std::io::{self, Stdout, Write};
use tracing::{debug, trace, warn};

pub mod environment;
pub mod error;
pub mod object;

/// What `run` does when a statement hits a runtime error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Report the error, substitute `0`, `""` or `false` and keep going.
    Continue,
    /// Report the error and stop the program.
    Abort,
}

impl Default for ErrorPolicy {
    fn default() -> Self {
        ErrorPolicy::Continue
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub max_variables: usize,
    pub on_error: ErrorPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_variables: DEFAULT_CAPACITY,
            on_error: ErrorPolicy::default(),
        }
    }
}

pub struct Evaluator<W: Write = Stdout> {
    environment: Environment,
    output: W,
    policy: ErrorPolicy,
    diagnostics: Vec<RuntimeError>,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    pub fn new() -> Self {
        Self::with_output(io::stdout(), Config::default())
    }
}

impl<W: Write> Evaluator<W> {
    pub fn with_output(output: W, config: Config) -> Self {
        Self {
            environment: Environment::with_capacity(config.max_variables),
            output,
            policy: config.on_error,
            diagnostics: Vec::new(),
        }
    }

    /// Executes the statements in order. Only returns an error when the
    /// policy is `Abort` or when output can't be written.
    pub fn run(&mut self, program: &[Statement]) -> Result<()> {
        program
            .iter()
            .try_for_each(|statement| self.eval_statement(statement))
    }

    /// Every runtime error reported so far, in order.
    pub fn diagnostics(&self) -> &[RuntimeError] {
        &self.diagnostics
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn get_variable(&self, name: &str) -> Option<&Object> {
        self.environment.get(name)
    }

    pub fn set_variable(&mut self, name: &str, value: Object) -> Result<()> {
        debug!(%name, %value, "binding variable");

        match self.environment.set(name, value) {
            Ok(()) => Ok(()),
            Err(e) => self.fail(e, ()),
        }
    }

    fn eval_statement(&mut self, statement: &Statement) -> Result<()> {
        trace!(%statement, "evaluating statement");

        match statement {
            Statement::Declare { ty, name, value } => {
                let value = match value {
                    Some(expr) => self.eval_as(*ty, expr)?,
                    None => Object::default_for(*ty),
                };

                self.set_variable(name, value)
            }
            Statement::Assign(name, expr) => {
                let ty = match self.environment.get(name) {
                    Some(existing) => existing.kind(),
                    None => return self.fail(RuntimeError::UndefinedVariable(name.clone()), ()),
                };

                let reported = self.diagnostics.len();
                let value = self.eval_as(ty, expr)?;

                // A wrongly typed value is rejected outright; any other
                // failure still stores the substituted default.
                if self.diagnostics[reported..]
                    .iter()
                    .any(RuntimeError::is_type_error)
                {
                    warn!(%name, "assignment rejected, variable keeps its previous value");
                    return Ok(());
                }

                self.set_variable(name, value)
            }
            Statement::Print(expr) => {
                let value = self.eval_as(self.display_kind(expr), expr)?;

                writeln!(self.output, "{}", value)
                    .map_err(|e| RuntimeError::Output(e.to_string()))
            }
        }
    }

    fn eval_as(&mut self, ty: VarType, expr: &Expr) -> Result<Object> {
        let object = match ty {
            VarType::Int => Object::Integer(self.eval_int(expr)?),
            VarType::String => Object::String(self.eval_string(expr)?),
            VarType::Bool => Object::Boolean(self.eval_bool(expr)?),
        };

        Ok(object)
    }

    /// Decides how a printed operand is rendered from its outermost node only.
    /// A binary operation always prints as an integer, so `print("a" + 1)`
    /// reports the string operand and prints `1`.
    fn display_kind(&self, expr: &Expr) -> VarType {
        match expr {
            Expr::Literal(Literal::Int(_)) | Expr::Infix(..) => VarType::Int,
            Expr::Literal(Literal::Bool(_)) => VarType::Bool,
            Expr::Literal(Literal::Str(_)) => VarType::String,
            Expr::Ident(name) => match self.environment.get(name) {
                Some(Object::Integer(_)) => VarType::Int,
                Some(Object::Boolean(_)) => VarType::Bool,
                _ => VarType::String,
            },
        }
    }

    pub fn eval_int(&mut self, expr: &Expr) -> Result<i64> {
        match expr {
            Expr::Literal(Literal::Int(int)) => Ok(*int),
            Expr::Literal(Literal::Bool(b)) => Ok(i64::from(*b)),
            Expr::Ident(name) => match self.environment.get(name) {
                Some(Object::Integer(int)) => Ok(*int),
                Some(other) => {
                    let found = other.kind();
                    self.mismatch(name, VarType::Int, found, 0)
                }
                None => self.fail(RuntimeError::UndefinedVariable(name.clone()), 0),
            },
            Expr::Infix(op, left, right) => {
                let left = self.eval_int(left)?;
                let right = self.eval_int(right)?;
                trace!(%op, left, right, "evaluating binary operation");

                self.eval_integer_infix_expr(*op, left, right)
            }
            other => self.unsupported(VarType::Int, other, 0),
        }
    }

    pub fn eval_bool(&mut self, expr: &Expr) -> Result<bool> {
        match expr {
            Expr::Literal(Literal::Bool(b)) => Ok(*b),
            Expr::Ident(name) => match self.environment.get(name) {
                Some(Object::Boolean(b)) => Ok(*b),
                Some(other) => {
                    let found = other.kind();
                    self.mismatch(name, VarType::Bool, found, false)
                }
                None => self.fail(RuntimeError::UndefinedVariable(name.clone()), false),
            },
            other => self.unsupported(VarType::Bool, other, false),
        }
    }

    pub fn eval_string(&mut self, expr: &Expr) -> Result<String> {
        match expr {
            Expr::Literal(Literal::Str(s)) => Ok(s.clone()),
            Expr::Ident(name) => match self.environment.get(name) {
                Some(Object::String(s)) => Ok(s.clone()),
                Some(other) => {
                    let found = other.kind();
                    self.mismatch(name, VarType::String, found, String::new())
                }
                None => self.fail(RuntimeError::UndefinedVariable(name.clone()), String::new()),
            },
            other => self.unsupported(VarType::String, other, String::new()),
        }
    }

    fn eval_integer_infix_expr(&mut self, op: Infix, left: i64, right: i64) -> Result<i64> {
        let result = match op {
            Infix::Plus => left.checked_add(right),
            Infix::Minus => left.checked_sub(right),
            Infix::Multiply => left.checked_mul(right),
            Infix::Divide if right == 0 => return self.fail(RuntimeError::DivisionByZero, 0),
            Infix::Divide => left.checked_div(right),
            Infix::Modulo if right == 0 => return self.fail(RuntimeError::ModuloByZero, 0),
            Infix::Modulo => left.checked_rem(right),
            Infix::Power => Self::power(left, right),
        };

        match result {
            Some(value) => Ok(value),
            None => self.fail(RuntimeError::Overflow { op, left, right }, 0),
        }
    }

    // Real-valued exponentiation truncated toward zero, so negative
    // exponents give 0 for |base| > 1.
    fn power(base: i64, exponent: i64) -> Option<i64> {
        let result = (base as f64).powf(exponent as f64).trunc();

        if result.is_finite() && result >= i64::MIN as f64 && result < i64::MAX as f64 {
            Some(result as i64)
        } else {
            None
        }
    }

    fn mismatch<T>(&mut self, name: &str, expected: VarType, found: VarType, default: T) -> Result<T> {
        let error = RuntimeError::TypeMismatch {
            name: name.to_string(),
            expected,
            found,
        };
        self.fail(error, default)
    }

    fn unsupported<T>(&mut self, expected: VarType, expr: &Expr, default: T) -> Result<T> {
        let error = RuntimeError::UnsupportedOperand {
            expected,
            found: expr.to_string(),
        };
        self.fail(error, default)
    }

    /// Reports `error`, then either substitutes `default` or aborts,
    /// depending on the policy.
    fn fail<T>(&mut self, error: RuntimeError, default: T) -> Result<T> {
        tracing::error!("{}", error);
        self.diagnostics.push(error.clone());

        match self.policy {
            ErrorPolicy::Continue => Ok(default),
            ErrorPolicy::Abort => Err(error),
        }
    }
}

#[cfg(test)]
mod test {
    use crate::{
        eval::{error::RuntimeError, object::Object, Config, ErrorPolicy, Evaluator},
        parser::{
            ast::{Infix, VarType},
            Parser,
        },
    };

    #[derive(Debug)]
    struct TestDataSimple<T> {
        input: &'static str,
        expected: T,
    }

    fn eval_with(input: &str, config: Config) -> (String, Evaluator<Vec<u8>>) {
        let program = Parser::parse_program(input);
        let mut evaluator = Evaluator::with_output(Vec::new(), config);
        evaluator.run(&program).unwrap();
        let output = String::from_utf8(evaluator.output.clone()).unwrap();

        (output, evaluator)
    }

    fn eval(input: &str) -> (String, Vec<RuntimeError>) {
        let (output, evaluator) = eval_with(input, Config::default());
        (output, evaluator.diagnostics().to_vec())
    }

    #[test]
    fn eval_integer_expression() {
        let test_data = vec![
            TestDataSimple {
                input: "5",
                expected: 5,
            },
            TestDataSimple {
                input: "2 + 3 * 4",
                expected: 14,
            },
            TestDataSimple {
                input: "2 ** 3 + 1",
                expected: 9,
            },
            TestDataSimple {
                input: "(2 + 3) * 4",
                expected: 20,
            },
            TestDataSimple {
                input: "10 - 2 - 3",
                expected: 5,
            },
            TestDataSimple {
                input: "50 / 2 * 2 + 10",
                expected: 60,
            },
            TestDataSimple {
                input: "17 % 5",
                expected: 2,
            },
            TestDataSimple {
                input: "2 ** 3 ** 2",
                expected: 512,
            },
            TestDataSimple {
                input: "2 ** 0",
                expected: 1,
            },
            TestDataSimple {
                input: "2 ** (0 - 1)",
                expected: 0,
            },
            TestDataSimple {
                input: "(0 - 7) / 2",
                expected: -3,
            },
            TestDataSimple {
                input: "(0 - 7) % 3",
                expected: -1,
            },
            TestDataSimple {
                input: "true + true + false",
                expected: 2,
            },
            TestDataSimple {
                input: "(5 + 10 * 2 + 15 / 3) * 2 - 10",
                expected: 50,
            },
        ];

        test_data.into_iter().for_each(|test_datum| {
            let (output, diagnostics) = eval(&format!("print({});", test_datum.input));

            assert_eq!(output, format!("{}\n", test_datum.expected), "{}", test_datum.input);
            assert!(diagnostics.is_empty());
        });
    }

    #[test]
    fn declare_and_print() {
        let test_data = vec![
            TestDataSimple {
                input: "int x = 5; print(x);",
                expected: "5\n",
            },
            TestDataSimple {
                input: r#"string s = "hello world"; print(s);"#,
                expected: "hello world\n",
            },
            TestDataSimple {
                input: "bool b = true; print(b); print(false);",
                expected: "true\nfalse\n",
            },
            TestDataSimple {
                input: "int a; string s; bool b; print(a); print(s); print(b);",
                expected: "0\n\nfalse\n",
            },
            TestDataSimple {
                input: "int a = 2; int b = a ** 3; a = b % 5; print(a); print(a * b);",
                expected: "3\n24\n",
            },
            TestDataSimple {
                input: r#"string a = "x"; string b = a; a = "y"; print(b); print(a);"#,
                expected: "x\ny\n",
            },
            TestDataSimple {
                input: "bool a = true; bool b = a; b = false; print(a); print(b);",
                expected: "true\nfalse\n",
            },
        ];

        test_data.into_iter().for_each(|test_datum| {
            let (output, diagnostics) = eval(test_datum.input);

            assert_eq!(output, test_datum.expected, "{}", test_datum.input);
            assert!(diagnostics.is_empty(), "{:?}", diagnostics);
        });
    }

    #[test]
    fn division_by_zero_binds_zero() {
        let (output, diagnostics) = eval("int a = 10 / 0; int b = 7 % 0; print(a); print(b);");

        assert_eq!(output, "0\n0\n");
        assert_eq!(
            diagnostics,
            vec![RuntimeError::DivisionByZero, RuntimeError::ModuloByZero]
        );
    }

    #[test]
    fn defaults_substitute_at_the_failing_operand() {
        let (output, diagnostics) = eval("int a = 1 + nope; print(a);");

        assert_eq!(output, "1\n");
        assert_eq!(
            diagnostics,
            vec![RuntimeError::UndefinedVariable("nope".to_string())]
        );
    }

    #[test]
    fn assignment_type_mismatch_is_rejected() {
        let (output, diagnostics) = eval("int x = 1; bool b = true; x = b; print(x);");

        assert_eq!(output, "1\n");
        assert_eq!(
            diagnostics,
            vec![RuntimeError::TypeMismatch {
                name: "b".to_string(),
                expected: VarType::Int,
                found: VarType::Bool,
            }]
        );
    }

    #[test]
    fn assignment_binds_default_after_arithmetic_error() {
        let test_data = vec![
            TestDataSimple {
                input: "int a = 5; a = 10 / 0; print(a);",
                expected: ("0\n", RuntimeError::DivisionByZero),
            },
            TestDataSimple {
                input: "int a = 5; a = 10 % 0; print(a);",
                expected: ("0\n", RuntimeError::ModuloByZero),
            },
            TestDataSimple {
                input: "int a = 5; a = 1 + nope; print(a);",
                expected: ("1\n", RuntimeError::UndefinedVariable("nope".to_string())),
            },
            TestDataSimple {
                input: "int a = 5; a = 10 ** 30; print(a);",
                expected: (
                    "0\n",
                    RuntimeError::Overflow {
                        op: Infix::Power,
                        left: 10,
                        right: 30,
                    },
                ),
            },
        ];

        test_data.into_iter().for_each(|test_datum| {
            let (output, diagnostics) = eval(test_datum.input);
            let (expected_output, expected_error) = test_datum.expected;

            assert_eq!(output, expected_output, "{}", test_datum.input);
            assert_eq!(diagnostics, vec![expected_error], "{}", test_datum.input);
        });

        let (output, _) = eval("int a = 5; a = 10 / 0; print(a); int b = 10 / 0; print(b);");
        assert_eq!(output, "0\n0\n");
    }

    #[test]
    fn assignment_unsupported_operand_is_rejected() {
        let (output, diagnostics) = eval(r#"bool b = true; b = "yes"; print(b);"#);

        assert_eq!(output, "true\n");
        assert_eq!(
            diagnostics,
            vec![RuntimeError::UnsupportedOperand {
                expected: VarType::Bool,
                found: r#""yes""#.to_string(),
            }]
        );
    }

    #[test]
    fn assignment_to_undeclared_variable() {
        let (output, evaluator) = eval_with("y = 3; print(1);", Config::default());

        assert_eq!(output, "1\n");
        assert_eq!(evaluator.get_variable("y"), None);
        assert_eq!(
            evaluator.diagnostics(),
            &[RuntimeError::UndefinedVariable("y".to_string())]
        );
    }

    #[test]
    fn declaration_type_mismatches_bind_defaults() {
        let (_, evaluator) = eval_with(
            r#"int n = 3; string s = n; bool b = 1; int i = "text";"#,
            Config::default(),
        );

        assert_eq!(evaluator.get_variable("s"), Some(&Object::String(String::new())));
        assert_eq!(evaluator.get_variable("b"), Some(&Object::Boolean(false)));
        assert_eq!(evaluator.get_variable("i"), Some(&Object::Integer(0)));
        assert_eq!(
            evaluator.diagnostics(),
            &[
                RuntimeError::TypeMismatch {
                    name: "n".to_string(),
                    expected: VarType::String,
                    found: VarType::Int,
                },
                RuntimeError::UnsupportedOperand {
                    expected: VarType::Bool,
                    found: "1".to_string(),
                },
                RuntimeError::UnsupportedOperand {
                    expected: VarType::Int,
                    found: r#""text""#.to_string(),
                },
            ]
        );
    }

    #[test]
    fn redeclaration_overwrites_binding() {
        let (output, evaluator) = eval_with(
            r#"string s = "first"; string s = "second"; print(s); int s = 4; print(s);"#,
            Config::default(),
        );

        assert_eq!(output, "second\n4\n");
        assert_eq!(evaluator.environment().len(), 1);
        assert_eq!(evaluator.get_variable("s"), Some(&Object::Integer(4)));
    }

    #[test]
    fn capacity_exceeded_keeps_prior_bindings() {
        let config = Config {
            max_variables: 2,
            ..Config::default()
        };
        let (output, evaluator) = eval_with(
            "int a = 1; int b = 2; int c = 3; a = 10; print(a); print(b);",
            config,
        );

        assert_eq!(output, "10\n2\n");
        assert_eq!(evaluator.get_variable("c"), None);
        assert_eq!(
            evaluator.diagnostics(),
            &[RuntimeError::CapacityExceeded {
                name: "c".to_string(),
                capacity: 2,
            }]
        );
    }

    #[test]
    fn abort_policy_stops_at_first_error() {
        let program = Parser::parse_program("print(1); int a = 1 / 0; print(2);");
        let config = Config {
            on_error: ErrorPolicy::Abort,
            ..Config::default()
        };
        let mut evaluator = Evaluator::with_output(Vec::new(), config);

        assert_eq!(evaluator.run(&program), Err(RuntimeError::DivisionByZero));
        assert_eq!(evaluator.get_variable("a"), None);
        assert_eq!(evaluator.into_output(), b"1\n".to_vec());
    }

    #[test]
    fn overflow_is_reported() {
        let (output, diagnostics) =
            eval("int big = 9223372036854775807 + 1; int p = 10 ** 30; print(big); print(p);");

        assert_eq!(output, "0\n0\n");
        assert_eq!(
            diagnostics,
            vec![
                RuntimeError::Overflow {
                    op: Infix::Plus,
                    left: i64::MAX,
                    right: 1,
                },
                RuntimeError::Overflow {
                    op: Infix::Power,
                    left: 10,
                    right: 30,
                },
            ]
        );
    }

    #[test]
    fn print_picks_display_from_outermost_node() {
        let (output, diagnostics) = eval(r#"print("a" + 1); print(ghost);"#);

        assert_eq!(output, "1\n\n");
        assert_eq!(
            diagnostics,
            vec![
                RuntimeError::UnsupportedOperand {
                    expected: VarType::Int,
                    found: r#""a""#.to_string(),
                },
                RuntimeError::UndefinedVariable("ghost".to_string()),
            ]
        );
    }
}
