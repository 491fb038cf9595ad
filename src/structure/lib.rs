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

#[macro_use] extern crate jdftx_assert_close;
#[macro_use] extern crate log;
#[macro_use] extern crate failure;
#[cfg(feature = "serde")]
#[macro_use] extern crate serde;

pub type FailResult<T> = Result<T, failure::Error>;

mod core;
mod util;

//---------------------------
// public reexports; API

pub use crate::core::lattice::Lattice;
pub use crate::core::coords::Coords;
pub use crate::core::kind::{Kind, KindError};
pub use crate::core::structure::{Structure, Site};

pub mod mat {
    //! Row-based 3x3 helpers on plain arrays.
    pub use crate::util::{M33, V3, det, inv, transpose, mat_mul, dot_n3_33, norm};
}
