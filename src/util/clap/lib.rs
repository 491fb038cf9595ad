/* ************************************************************************ **
** This file is part of jdftx-plugin, and is licensed under EITHER the MIT  **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
**                                                                          **
** Be aware that not all of jdftx-plugin is provided under this permissive  **
** license, and that the project as a whole is licensed under the GPL 3.0.  **
** ************************************************************************ */

pub use clap;

/// Alternative to `clap_app!`. Produces a `clap::Arg`.
///
/// ```text
/// arg!( *name [-o][--output]=OUTDIR... "help" )
///       |      |               |     |    |
///       |      |               |     |    help text
///       |      |               |     may be given multiple times
///       |      |               takes a value (or names a positional)
///       |      short and long flags; none means positional
///       '*' required, '?' optional, nothing: positionals are required
/// ```
///
/// Options that take a value always take exactly one per occurrence,
/// so `-c a -c b` works but `-c a b` does not.
///
/// See the tests at the bottom for examples.
#[macro_export]
macro_rules! arg {
    //--- flags, munched one at a time ---
    (@opts $req:tt $name:tt [$($opt:tt)*] [$($o:tt)+] $($rest:tt)*)
    => { $crate::arg!(@opts $req $name [$($opt)* [$($o)+]] $($rest)*) };

    (@opts $req:tt $name:tt $opts:tt = $VALUE:ident $($rest:tt)*)
    => { $crate::arg!(@multiple $req $name $opts (Some(stringify!($VALUE))) $($rest)*) };

    (@opts $req:tt $name:tt $opts:tt $($rest:tt)*)
    => { $crate::arg!(@multiple $req $name $opts (None) $($rest)*) };

    //--- "..." ---
    (@multiple $req:tt $name:tt $opts:tt $value:tt ... $($rest:tt)*)
    => { $crate::arg!(@finish $req $name $opts $value (true) $($rest)*) };

    (@multiple $req:tt $name:tt $opts:tt $value:tt $($rest:tt)*)
    => { $crate::arg!(@finish $req $name $opts $value (false) $($rest)*) };

    //--- build it ---
    (@finish $req:tt ($name:expr) [$($opt:tt)*] ($value:expr) ($multiple:expr) $($help:expr)?)
    => {{
        let b = $crate::clap::Arg::with_name($name)
            .required($crate::arg!(@required $req [$($opt)*]))
            .multiple($multiple);
        $( let b = $crate::arg!(@add-opt b $opt); )*
        let value: Option<&'static str> = $value;
        let b = match value {
            Some(v) => b.takes_value(true).value_name(v).number_of_values(1),
            None => b,
        };
        $( let b = b.help($help); )?
        b
    }};

    (@required (*) $opts:tt) => { true };
    (@required (?) $opts:tt) => { false };
    (@required () []) => { true };
    (@required () [$($opts:tt)+]) => { false };

    (@add-opt $b:ident [- - $($long:tt)+]) => { $b.long(concat!($(stringify!($long)),+)) };
    (@add-opt $b:ident [- $short:tt]) => { $b.short(stringify!($short)) };

    //--- entry ---
    (* $name:ident $($rest:tt)*) => { $crate::arg!(@opts (*) (stringify!($name)) [] $($rest)*) };
    (? $name:ident $($rest:tt)*) => { $crate::arg!(@opts (?) (stringify!($name)) [] $($rest)*) };
    ($name:ident $($rest:tt)*) => { $crate::arg!(@opts () (stringify!($name)) [] $($rest)*) };
}

/// Accessors for arguments that clap has already been told are required.
pub trait ArgMatchesExt {
    fn expect_value_of(&self, s: &str) -> String;
    fn expect_values_of(&self, s: &str) -> Vec<String>;
}

impl<'a> ArgMatchesExt for clap::ArgMatches<'a> {
    fn expect_value_of(&self, s: &str) -> String
    { self.value_of(s).unwrap_or_else(|| panic!("BUG! ({} was required)", s)).into() }

    fn expect_values_of(&self, s: &str) -> Vec<String>
    { self.values_of(s).unwrap_or_else(|| panic!("BUG! ({} was required)", s)).map(Into::into).collect() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app<'a, 'b>(args: Vec<clap::Arg<'a, 'b>>) -> clap::App<'a, 'b>
    { clap::App::new("test").args(&args) }

    #[test]
    fn examples() {
        let m = app(vec![
            arg!(*outdir [-o][--output]=OUTDIR "output directory"),
            arg!( force [-f][--force] "replace existing output directories"),
            arg!( config [-c][--config]=CONFIG... "settings yaml"),
            arg!( input=RETRIEVED "retrieved directory"),
            arg!(?extra=EXTRA),
            arg!( dry_run [--dry-run]),
        ]).get_matches_from(vec!["test", "here", "-o", "out", "-c", "a.yaml", "--config", "b:1", "--dry-run"]);

        assert_eq!(m.expect_value_of("outdir"), "out");
        assert_eq!(m.expect_value_of("input"), "here");
        assert_eq!(m.expect_values_of("config"), vec!["a.yaml", "b:1"]);
        assert!(!m.is_present("force"));
        assert!(m.is_present("dry_run"));
        assert!(!m.is_present("extra"));
    }

    #[test]
    fn required_is_enforced() {
        let result = app(vec![
            arg!(*outdir [-o][--output]=OUTDIR "output directory"),
        ]).get_matches_from_safe(vec!["test"]);
        assert!(result.is_err());
    }
}
