mod create_service_tests;
mod mock_sms_tests;
