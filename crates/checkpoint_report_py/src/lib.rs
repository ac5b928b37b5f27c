use std::collections::BTreeMap;
use std::io;

use checkpoint_report::{
    CheckpointReportError, ReportRun, SpecReportLayout, SpecReportOptions,
    build_default_output_path, ensure_unique_path, process_file_with_options,
};
use pyo3::exceptions::{PyFileNotFoundError, PyOSError, PyPermissionError, PyValueError};
use pyo3::prelude::*;

const N_BRIDGE_ABI_VERSION: u64 = 1;
const C_BRIDGE_CONTRACT_VERSION: &str = "checkpoint.report.process_file.v1";
const C_BRIDGE_TRANSPORT: &str = "rust_native";

#[pyclass(name = "ReportRun")]
#[derive(Debug, Clone)]
struct PyReportRun {
    #[pyo3(get)]
    cnt_rows_scanned: u64,
    #[pyo3(get)]
    cnt_sections: u64,
    #[pyo3(get)]
    cnt_passes: u64,
    #[pyo3(get)]
    cnt_passes_ignored: u64,
    #[pyo3(get)]
    period: String,
    #[pyo3(get)]
    file_out: String,
    #[pyo3(get)]
    col_name: usize,
    #[pyo3(get)]
    col_duration: usize,
    #[pyo3(get)]
    sheet_name: String,
    #[pyo3(get)]
    widths: Vec<usize>,
    #[pyo3(get)]
    warnings: Vec<String>,
    summary: String,
    dict_counts: BTreeMap<String, u64>,
}

impl From<ReportRun> for PyReportRun {
    fn from(report_run: ReportRun) -> Self {
        Self {
            summary: report_run.to_string(),
            dict_counts: report_run.to_dict(),
            cnt_rows_scanned: report_run.cnt_rows_scanned,
            cnt_sections: report_run.cnt_sections,
            cnt_passes: report_run.cnt_passes,
            cnt_passes_ignored: report_run.cnt_passes_ignored,
            period: report_run.period,
            file_out: report_run.path_file_out.to_string_lossy().to_string(),
            col_name: report_run.layout_columns.col_name,
            col_duration: report_run.layout_columns.col_duration,
            sheet_name: report_run.sheet_name,
            widths: report_run.widths,
            warnings: report_run.warnings,
        }
    }
}

#[pymethods]
impl PyReportRun {
    fn to_dict(&self) -> BTreeMap<String, u64> {
        self.dict_counts.clone()
    }

    fn __repr__(&self) -> String {
        self.summary.clone()
    }

    fn __str__(&self) -> String {
        self.summary.clone()
    }
}

fn map_report_error(exception: CheckpointReportError) -> PyErr {
    let c_message = exception.to_string();
    match (exception.io_error_kind(), &exception) {
        (Some(io::ErrorKind::NotFound), _) => PyFileNotFoundError::new_err(c_message),
        (Some(io::ErrorKind::PermissionDenied), _) => PyPermissionError::new_err(c_message),
        (Some(_), _) | (None, CheckpointReportError::OutputUnwritable { .. }) => {
            PyOSError::new_err(c_message)
        }
        (None, CheckpointReportError::SourceUnreadable(_)) => PyValueError::new_err(c_message),
    }
}

fn derive_report_options(include_group: bool) -> SpecReportOptions {
    let layout = if include_group {
        SpecReportLayout::grouped()
    } else {
        SpecReportLayout::ungrouped()
    };
    SpecReportOptions {
        layout,
        ..Default::default()
    }
}

#[pyfunction(name = "process_file_report")]
#[pyo3(signature = (file_source, file_destination, include_group = true))]
fn process_file_report_py(
    py: Python<'_>,
    file_source: String,
    file_destination: String,
    include_group: bool,
) -> PyResult<PyReportRun> {
    let spec_options = derive_report_options(include_group);
    let report_run = py.allow_threads(|| {
        process_file_with_options(file_source, file_destination, &spec_options)
            .map_err(map_report_error)
    })?;
    Ok(PyReportRun::from(report_run))
}

/// Build the report and return the path it was saved to.
#[pyfunction(name = "process_file")]
#[pyo3(signature = (file_source, file_destination, include_group = true))]
fn process_file_py(
    py: Python<'_>,
    file_source: String,
    file_destination: String,
    include_group: bool,
) -> PyResult<String> {
    let report_run = process_file_report_py(py, file_source, file_destination, include_group)?;
    Ok(report_run.file_out)
}

#[pyfunction(name = "build_default_output_path")]
fn build_default_output_path_py(file_source: String) -> String {
    build_default_output_path(file_source)
        .to_string_lossy()
        .to_string()
}

#[pyfunction(name = "ensure_unique_path")]
fn ensure_unique_path_py(file_path: String) -> String {
    ensure_unique_path(file_path).to_string_lossy().to_string()
}

#[pymodule]
fn _checkpoint_report_rs(module: &Bound<'_, PyModule>) -> PyResult<()> {
    module.add_class::<PyReportRun>()?;
    module.add_function(wrap_pyfunction!(process_file_py, module)?)?;
    module.add_function(wrap_pyfunction!(process_file_report_py, module)?)?;
    module.add_function(wrap_pyfunction!(build_default_output_path_py, module)?)?;
    module.add_function(wrap_pyfunction!(ensure_unique_path_py, module)?)?;
    module.add("__bridge_abi__", N_BRIDGE_ABI_VERSION)?;
    module.add("__bridge_contract__", C_BRIDGE_CONTRACT_VERSION)?;
    module.add("__bridge_transport__", C_BRIDGE_TRANSPORT)?;
    Ok(())
}
