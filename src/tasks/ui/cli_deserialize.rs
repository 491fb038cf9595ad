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

use crate::FailResult;

/// A group of command line arguments that several binaries share.
///
/// Implementors add their args to an app, and later read them back out of
/// the matches. Groups combine as tuples.
pub trait CliDeserialize: Sized {
    fn augment_clap_app<'a, 'b>(app: clap::App<'a, 'b>) -> (clap::App<'a, 'b>, ClapDeserializer<Self>) {
        let app = Self::_augment_clap_app(app);
        let token = ClapDeserializer(Default::default());
        (app, token)
    }

    /// Don't use this. Call 'augment_clap_app' instead.
    fn _augment_clap_app<'a, 'b>(app: clap::App<'a, 'b>) -> clap::App<'a, 'b>;
    /// Don't use this. Call 'resolve_args' on the ClapDeserializer instead.
    fn _resolve_args(matches: &clap::ArgMatches<'_>) -> FailResult<Self>;
}

/// Token showing that a clap app was given the args needed to produce `A`.
pub struct ClapDeserializer<A>(std::marker::PhantomData<A>);

impl<A: CliDeserialize> ClapDeserializer<A> {
    /// May perform IO, such as reading config files.
    pub fn resolve_args(self, matches: &clap::ArgMatches<'_>) -> FailResult<A>
    { A::_resolve_args(matches) }
}

impl CliDeserialize for () {
    fn _augment_clap_app<'a, 'b>(app: clap::App<'a, 'b>) -> clap::App<'a, 'b>
    { app }

    fn _resolve_args(_: &clap::ArgMatches<'_>) -> FailResult<Self>
    { Ok(()) }
}

impl<A, B> CliDeserialize for (A, B)
where
    A: CliDeserialize,
    B: CliDeserialize,
{
    fn _augment_clap_app<'a, 'b>(app: clap::App<'a, 'b>) -> clap::App<'a, 'b>
    { B::_augment_clap_app(A::_augment_clap_app(app)) }

    fn _resolve_args(matches: &clap::ArgMatches<'_>) -> FailResult<Self>
    { Ok((A::_resolve_args(matches)?, B::_resolve_args(matches)?)) }
}

impl<A, B, C> CliDeserialize for (A, B, C)
where
    A: CliDeserialize,
    B: CliDeserialize,
    C: CliDeserialize,
{
    fn _augment_clap_app<'a, 'b>(app: clap::App<'a, 'b>) -> clap::App<'a, 'b>
    { C::_augment_clap_app(B::_augment_clap_app(A::_augment_clap_app(app))) }

    fn _resolve_args(matches: &clap::ArgMatches<'_>) -> FailResult<Self>
    { Ok((A::_resolve_args(matches)?, B::_resolve_args(matches)?, C::_resolve_args(matches)?)) }
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Dry(bool);

    impl CliDeserialize for Dry {
        fn _augment_clap_app<'a, 'b>(app: clap::App<'a, 'b>) -> clap::App<'a, 'b>
        { app.arg(arg!( dry_run [--dry-run] "do nothing")) }

        fn _resolve_args(m: &clap::ArgMatches<'_>) -> FailResult<Self>
        { Ok(Dry(m.is_present("dry_run"))) }
    }

    #[test]
    fn tuples() {
        let (app, de) = CliDeserialize::augment_clap_app(clap::App::new("test"));
        let matches = app.get_matches_from(vec!["test", "--dry-run"]);
        let ((), Dry(dry), ()) = de.resolve_args(&matches).unwrap();
        assert!(dry);
    }
}
