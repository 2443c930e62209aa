mod tests_errors;
mod tests_properties;
mod tests_scenarios;
mod tests_visibility;
