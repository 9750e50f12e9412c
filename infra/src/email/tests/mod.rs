mod email_service_tests;
