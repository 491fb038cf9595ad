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
use crate::cmd::{self, CalcJobInputs};
use crate::cmd::calc_job::structure_from_settings;
use crate::exit_code::ExitCode;
use crate::ui::cfg_merging::ConfigSources;
use crate::ui::cli_deserialize::CliDeserialize;
use crate::ui::logging::GlobalLogger;

use jdftx_clap::ArgMatchesExt;
use jdftx_fs_util as fsx;
use jdftx_io::RetrievedDir;
use jdftx_tasks_config::{Settings, ValidatedSettings, YamlRead};

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

fn wrap_result_main<F>(main: F)
where F: FnOnce() -> FailResult<()>,
{
    main().unwrap_or_else(|e| {
        for cause in e.iter_chain() {
            error!("{}", cause);
        }

        if let Some(code) = e.downcast_ref::<ExitCode>() {
            std::process::exit(code.status as i32);
        }

        if std::env::var_os("RUST_BACKTRACE") == Some(OsStr::new("1").to_owned()) {
            error!("{}", e.backtrace());
        } else {
            error!("\
                (If you found the above error message to be particularly lacking in \
                detail, try again with RUST_BACKTRACE=1)\
            ");
        }
        std::process::exit(1);
    });
}

//--------------------------------------------------------------------------------------
// argument groups

struct LoggingArgs {
    verbosity: i32,
    logfile: Option<PathBuf>,
}

impl CliDeserialize for LoggingArgs {
    fn _augment_clap_app<'a, 'b>(app: clap::App<'a, 'b>) -> clap::App<'a, 'b> {
        app.args(&[
            arg!( verbose [-v][--verbose]... "log more. Give twice for even more."),
            arg!( quiet [-q][--quiet] "only log warnings and errors"),
            arg!( logfile [--log]=LOGFILE "also write the log to this file"),
        ])
    }

    fn _resolve_args(m: &clap::ArgMatches<'_>) -> FailResult<Self> {
        Ok(LoggingArgs {
            verbosity: match m.is_present("quiet") {
                true => -1,
                false => m.occurrences_of("verbose") as i32,
            },
            logfile: m.value_of("logfile").map(PathBuf::from),
        })
    }
}

impl LoggingArgs {
    fn apply(&self) -> FailResult<()> {
        let mut logger = GlobalLogger::default();
        logger.verbosity(self.verbosity);
        if let Some(path) = &self.logfile {
            logger.path(path);
        }
        logger.apply()
    }
}

struct ConfigArgs(ConfigSources);

impl CliDeserialize for ConfigArgs {
    fn _augment_clap_app<'a, 'b>(app: clap::App<'a, 'b>) -> clap::App<'a, 'b> {
        app.args(&[
            arg!(*config [-c][--config]=CONFIG... "\
                settings yaml, provided as either a filepath, or as an embedded literal \
                (via syntax described below). \
                When provided multiple times, the configs are merged, \
                with preference to the values supplied in later arguments. \
                \n\n\
                Literals are written as '--config [NESTED_KEY]:VALID_YAML', \
                where NESTED_KEY is an optional '.'-separated sequence of string keys, \
                and the ':' is a literal colon. When provided, NESTED_KEY constructs a nested \
                mapping (so `--config kpoints.mesh:[2,2,2]` is equivalent to \
                `--config :{kpoints: {mesh: [2,2,2]}}`).\
                \n\n\
                Note that detection of filepaths versus literals is based solely \
                on the presence of a colon.\
            "),
        ])
    }

    fn _resolve_args(m: &clap::ArgMatches<'_>) -> FailResult<Self>
    { Ok(ConfigArgs(ConfigSources::resolve_from_args(m.expect_values_of("config"))?)) }
}

impl ConfigArgs {
    fn into_settings(self) -> FailResult<(serde_yaml::Value, ValidatedSettings)> {
        let yaml = self.0.into_effective_yaml();
        let settings = Settings::from_value(yaml.clone())?;
        Ok((yaml, settings.validate()?))
    }
}

struct OutputDirArgs {
    outdir: PathBuf,
    force: bool,
}

impl CliDeserialize for OutputDirArgs {
    fn _augment_clap_app<'a, 'b>(app: clap::App<'a, 'b>) -> clap::App<'a, 'b> {
        app.args(&[
            arg!(*outdir [-o][--output]=OUTDIR "directory to write the job into"),
            arg!( force [-f][--force] "replace an existing output directory"),
        ])
    }

    fn _resolve_args(m: &clap::ArgMatches<'_>) -> FailResult<Self> {
        Ok(OutputDirArgs {
            outdir: PathBuf::from(m.expect_value_of("outdir")),
            force: m.is_present("force"),
        })
    }
}

impl OutputDirArgs {
    fn create(&self) -> FailResult<()> {
        if self.outdir.exists() {
            match self.force {
                true => fsx::rm_rf(&self.outdir)?,
                false => bail!("'{}' already exists; use --force to replace it", self.outdir.display()),
            }
        }
        fsx::create_dir_all(&self.outdir)?;
        Ok(())
    }
}

fn write_json(path: &Path, value: &impl serde::Serialize) -> FailResult<()> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    fsx::write(path, text)?;
    Ok(())
}

//--------------------------------------------------------------------------------------

// %% CRATES: binary: jdftx-write-input %%
pub fn write_input() {
    wrap_result_main(|| {
        let (app, de) = CliDeserialize::augment_clap_app({
            clap::App::new("jdftx-write-input")
                .version(env!("CARGO_PKG_VERSION"))
                .about("Write a JDFTx input file and stage its pseudopotentials.")
        });
        let matches = app.get_matches();
        let (logging, configs, dir_args): (LoggingArgs, ConfigArgs, OutputDirArgs) = de.resolve_args(&matches)?;
        logging.apply()?;

        let (yaml, validated) = configs.into_settings()?;
        let inputs = CalcJobInputs::from_settings(&validated)?;

        dir_args.create()?;
        let outdir = &dir_args.outdir;
        fsx::write(outdir.join("settings.yaml"), serde_yaml::to_string(&yaml)?)?;

        let calc_info = cmd::prepare_for_submission(&inputs, outdir)?;
        cmd::stage_local_copies(&calc_info.local_copy_list, outdir)?;
        write_json(&outdir.join("calcinfo.json"), &calc_info)?;

        info!("job written to '{}'", outdir.display());
        Ok(())
    });
}

// %% CRATES: binary: jdftx-parse-output %%
pub fn parse_output() {
    wrap_result_main(|| {
        let (app, de) = CliDeserialize::augment_clap_app({
            clap::App::new("jdftx-parse-output")
                .version(env!("CARGO_PKG_VERSION"))
                .about("Read the files retrieved from a JDFTx run.")
                .args(&[
                    arg!( retrieved=RETRIEVED_DIR "directory holding the retrieved files"),
                    arg!(*output [-o][--output]=OUT_JSON "where to write the parsed outputs"),
                ])
        });
        let matches = app.get_matches();
        let (logging, configs): (LoggingArgs, ConfigArgs) = de.resolve_args(&matches)?;
        logging.apply()?;

        let (_, validated) = configs.into_settings()?;
        let settings = &validated.settings;
        let input_structure = structure_from_settings(&settings.structure)?;

        let retrieved = RetrievedDir::new(matches.expect_value_of("retrieved"));
        let outcome = cmd::parse(&retrieved, &input_structure, &settings.options)?;
        write_json(matches.expect_value_of("output").as_ref(), &outcome)?;

        match outcome.exit_code {
            None => {
                info!("parsed '{}' successfully", retrieved.path().display());
                Ok(())
            },
            Some(code) => Err(code.into()),
        }
    });
}
