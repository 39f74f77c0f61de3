mod connector_tests;
mod elaborator_tests;
